//! # Type Tags
//!
//! `ValueType` names the runtime type of a [`Value`](crate::Value) and is the
//! payload of an exact-type schema. Instance checks honour subtyping:
//!
//! - every value is an instance of `object`;
//! - `bool` is a subtype of `int`;
//! - a user class is a subtype of every class on its parent chain.
//!
//! User classes are declared through a [`TypeRegistry`], which also resolves
//! type names for schema documents.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::CoreError;

/// Shared handle to a user class.
pub type ClassRef = Arc<Class>;

/// A user-declared class with an optional single parent.
///
/// Classes compare by identity: two separately declared classes are distinct
/// types even when their names and parents agree.
#[derive(Debug)]
pub struct Class {
    name: String,
    parent: Option<ClassRef>,
}

impl Class {
    /// Declare a root class.
    pub fn new(name: impl Into<String>) -> ClassRef {
        Arc::new(Self {
            name: name.into(),
            parent: None,
        })
    }

    /// Declare a class deriving from `parent`.
    pub fn derived(name: impl Into<String>, parent: &ClassRef) -> ClassRef {
        Arc::new(Self {
            name: name.into(),
            parent: Some(Arc::clone(parent)),
        })
    }

    /// The class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The direct parent, if any.
    pub fn parent(&self) -> Option<&ClassRef> {
        self.parent.as_ref()
    }

    /// True if `self` is `other` or derives from it.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if std::ptr::eq(class, other) {
                return true;
            }
            current = class.parent.as_deref();
        }
        false
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Class {}

/// Runtime type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// Top type; every value is an instance.
    Object,
    NoneType,
    Bool,
    Int,
    Float,
    Str,
    List,
    Tuple,
    Dict,
    /// A user class.
    Class(ClassRef),
}

impl ValueType {
    /// Resolve a builtin type name (`int`, `str`, `list`, ...).
    pub fn from_builtin_name(name: &str) -> Option<Self> {
        let ty = match name {
            "object" => Self::Object,
            "None" | "NoneType" => Self::NoneType,
            "bool" => Self::Bool,
            "int" => Self::Int,
            "float" => Self::Float,
            "str" => Self::Str,
            "list" => Self::List,
            "tuple" => Self::Tuple,
            "dict" => Self::Dict,
            _ => return None,
        };
        Some(ty)
    }

    /// The type's name as it appears in diagnostics.
    pub fn name(&self) -> &str {
        match self {
            Self::Object => "object",
            Self::NoneType => "NoneType",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::List => "list",
            Self::Tuple => "tuple",
            Self::Dict => "dict",
            Self::Class(class) => class.name(),
        }
    }

    /// True if a value of type `self` is an instance of `other`.
    pub fn is_subtype_of(&self, other: &ValueType) -> bool {
        match (self, other) {
            (_, Self::Object) => true,
            (Self::Bool, Self::Int) => true,
            (Self::Class(a), Self::Class(b)) => a.is_subclass_of(b),
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name-indexed set of user classes layered over the builtin types.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    classes: BTreeMap<String, ClassRef>,
}

impl TypeRegistry {
    /// A registry that knows only the builtin types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, optionally deriving from an already-registered parent.
    ///
    /// # Errors
    ///
    /// `DuplicateClass` if the name is taken (builtin names included),
    /// `UnknownParent` if `parent` has not been registered.
    pub fn declare(&mut self, name: &str, parent: Option<&str>) -> Result<ClassRef, CoreError> {
        if self.classes.contains_key(name) || ValueType::from_builtin_name(name).is_some() {
            return Err(CoreError::DuplicateClass(name.to_string()));
        }
        let class = match parent {
            None => Class::new(name),
            Some(parent_name) => {
                let parent = self.classes.get(parent_name).ok_or_else(|| {
                    CoreError::UnknownParent {
                        class: name.to_string(),
                        parent: parent_name.to_string(),
                    }
                })?;
                Class::derived(name, parent)
            }
        };
        self.classes.insert(name.to_string(), Arc::clone(&class));
        Ok(class)
    }

    /// Look up a registered class by name.
    pub fn class(&self, name: &str) -> Option<&ClassRef> {
        self.classes.get(name)
    }

    /// Resolve a builtin or registered type name.
    pub fn resolve(&self, name: &str) -> Result<ValueType, CoreError> {
        if let Some(ty) = ValueType::from_builtin_name(name) {
            return Ok(ty);
        }
        self.classes
            .get(name)
            .map(|class| ValueType::Class(Arc::clone(class)))
            .ok_or_else(|| CoreError::UnknownType(name.to_string()))
    }
}
