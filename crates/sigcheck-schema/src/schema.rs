//! # Schema Language
//!
//! A [`Schema`] describes what a value crossing a call boundary must look
//! like. The union is closed: every schema is one of
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | `Any` | no constraint |
//! | `Type(T)` | value is an instance of `T` (subtypes included) |
//! | `Sequence { kind, [s] }` | list/tuple of any length, every element matches `s` |
//! | `Sequence { kind, [s0, s1, ..] }` | list/tuple of exactly that length, matched positionally |
//! | `Mapping([(k, v)])` | dict whose every key matches `k` and every value matches `v` |
//! | `Composite(c)` | user object that performs its own check |
//!
//! A one-element sequence schema always means "homogeneous, any length",
//! never "exactly one element".
//!
//! A mapping schema is stored as its entry list so that a schema authored
//! with zero or several entries can be reported as malformed when it is
//! used, rather than silently reinterpreted.

use std::fmt;
use std::sync::Arc;

use sigcheck_core::{Value, ValueType};

use crate::combinators::{AndChecker, OrChecker};
use crate::error::SchemaViolation;
use crate::trail::Trail;
use crate::validate::{ParamId, Validator};

/// Ordered container kinds a sequence schema can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    List,
    Tuple,
}

impl SequenceKind {
    /// The runtime type a value must have.
    pub fn value_type(self) -> ValueType {
        match self {
            Self::List => ValueType::List,
            Self::Tuple => ValueType::Tuple,
        }
    }

    /// Elements of `value` if it is exactly this container kind.
    pub fn elements(self, value: &Value) -> Option<&[Value]> {
        match (self, value) {
            (Self::List, Value::List(items)) | (Self::Tuple, Value::Tuple(items)) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "list",
            Self::Tuple => "tuple",
        })
    }
}

/// A schema object that checks values itself.
///
/// Implementers recurse through [`Validator::validate_at`] for any
/// sub-schemas they hold, extending the trail as they see fit, and either
/// return `Ok(())` or a violation. [`AndChecker`] and [`OrChecker`] are the
/// two built-in implementers.
pub trait Composite: fmt::Debug + fmt::Display + Send + Sync {
    /// Check `value` for `param`, continuing from `trail`.
    fn check(
        &self,
        validator: &Validator,
        param: &ParamId,
        value: &Value,
        trail: &Trail<'_>,
    ) -> Result<(), SchemaViolation>;
}

/// A structural schema. Cheap to clone; composites are shared.
#[derive(Debug, Clone)]
pub enum Schema {
    /// No constraint.
    Any,
    /// Exact type, subtypes included.
    Type(ValueType),
    /// List or tuple; one element schema is homogeneous, otherwise fixed arity.
    Sequence {
        kind: SequenceKind,
        elements: Vec<Schema>,
    },
    /// Dict; well-formed only with exactly one `(key, value)` entry.
    Mapping(Vec<(Schema, Schema)>),
    /// User-defined check.
    Composite(Arc<dyn Composite>),
}

impl Schema {
    /// Exact-type schema.
    pub fn of(ty: ValueType) -> Self {
        Self::Type(ty)
    }

    /// Homogeneous list of any length.
    pub fn list_of(element: Schema) -> Self {
        Self::Sequence {
            kind: SequenceKind::List,
            elements: vec![element],
        }
    }

    /// Homogeneous tuple of any length.
    pub fn tuple_of(element: Schema) -> Self {
        Self::Sequence {
            kind: SequenceKind::Tuple,
            elements: vec![element],
        }
    }

    /// List schema from element schemas (fixed arity unless exactly one).
    pub fn list(elements: impl IntoIterator<Item = Schema>) -> Self {
        Self::Sequence {
            kind: SequenceKind::List,
            elements: elements.into_iter().collect(),
        }
    }

    /// Tuple schema from element schemas (fixed arity unless exactly one).
    pub fn tuple(elements: impl IntoIterator<Item = Schema>) -> Self {
        Self::Sequence {
            kind: SequenceKind::Tuple,
            elements: elements.into_iter().collect(),
        }
    }

    /// Dict whose keys match `key` and values match `value`.
    pub fn dict(key: Schema, value: Schema) -> Self {
        Self::Mapping(vec![(key, value)])
    }

    /// Wrap a user composite.
    pub fn composite(checker: impl Composite + 'static) -> Self {
        Self::Composite(Arc::new(checker))
    }

    /// Value must satisfy every schema; stops at the first failure.
    pub fn all_of(schemas: impl IntoIterator<Item = Schema>) -> Self {
        Self::composite(AndChecker::new(schemas))
    }

    /// Value must satisfy at least one schema.
    pub fn any_of(schemas: impl IntoIterator<Item = Schema>) -> Self {
        Self::composite(OrChecker::new(schemas))
    }
}

impl From<ValueType> for Schema {
    fn from(ty: ValueType) -> Self {
        Self::Type(ty)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, schemas: &[Schema]) -> fmt::Result {
    for (i, schema) in schemas.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{schema}")?;
    }
    Ok(())
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Type(ty) => write!(f, "{ty}"),
            Self::Sequence {
                kind: SequenceKind::List,
                elements,
            } => {
                f.write_str("[")?;
                write_joined(f, elements)?;
                f.write_str("]")
            }
            Self::Sequence {
                kind: SequenceKind::Tuple,
                elements,
            } => {
                f.write_str("(")?;
                write_joined(f, elements)?;
                if elements.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Self::Mapping(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Composite(checker) => write!(f, "{checker}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mirrors_literal_shapes() {
        let int = Schema::of(ValueType::Int);
        let str_ = Schema::of(ValueType::Str);
        assert_eq!(Schema::Any.to_string(), "any");
        assert_eq!(Schema::list_of(int.clone()).to_string(), "[int]");
        assert_eq!(Schema::tuple_of(int.clone()).to_string(), "(int,)");
        assert_eq!(
            Schema::tuple([int.clone(), str_.clone()]).to_string(),
            "(int, str)"
        );
        assert_eq!(
            Schema::dict(str_.clone(), Schema::list_of(int.clone())).to_string(),
            "{str: [int]}"
        );
        assert_eq!(Schema::any_of([int, str_]).to_string(), "OrChecker(int, str)");
    }

    #[test]
    fn sequence_kind_matches_only_its_container() {
        let list = Value::list([Value::Int(1)]);
        let tuple = Value::tuple([Value::Int(1)]);
        assert!(SequenceKind::List.elements(&list).is_some());
        assert!(SequenceKind::List.elements(&tuple).is_none());
        assert!(SequenceKind::Tuple.elements(&tuple).is_some());
        assert!(SequenceKind::Tuple.elements(&Value::None).is_none());
    }
}
