//! # Call Guards
//!
//! A [`Guard`] wraps a function body with a [`Signature`]: it binds call
//! arguments to parameters, checks each parameter that carries a schema,
//! runs the body, and checks the result.
//!
//! ## Gates
//!
//! Checking runs only when both the process-wide flag
//! ([`set_global_checking`]) and the guard's own flag
//! ([`Guard::set_checking`]) are on. With either off the body runs with the
//! bound arguments and nothing is validated.
//!
//! ## Ordering
//!
//! Parameters are checked in declaration order and the first violation
//! aborts the call before the body runs. A result violation is reported
//! after the body has run; the computed result is discarded.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use sigcheck_core::Value;
use thiserror::Error;

use crate::config::CheckConfig;
use crate::error::SchemaViolation;
use crate::schema::Schema;
use crate::validate::{ParamId, Validator};

static GLOBAL_CHECKING: AtomicBool = AtomicBool::new(true);

/// Turn checking on or off for every guard in the process.
pub fn set_global_checking(on: bool) {
    GLOBAL_CHECKING.store(on, Ordering::SeqCst);
}

/// Whether process-wide checking is on.
pub fn global_checking() -> bool {
    GLOBAL_CHECKING.load(Ordering::SeqCst)
}

/// Arguments could not be bound to the signature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("{function}() takes {expected} positional arguments but {given} were given")]
    TooManyPositional {
        function: String,
        expected: usize,
        given: usize,
    },

    #[error("{function}() got an unexpected keyword argument '{name}'")]
    UnexpectedKeyword { function: String, name: String },

    #[error("{function}() got multiple values for argument '{name}'")]
    DuplicateArgument { function: String, name: String },

    #[error("{function}() missing required argument: '{name}'")]
    MissingArgument { function: String, name: String },
}

/// A guarded call failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallError {
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Violation(#[from] SchemaViolation),
}

/// One declared parameter.
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    schema: Option<Schema>,
    default: Option<Value>,
}

impl Param {
    /// An unannotated parameter without default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            default: None,
        }
    }

    /// Attach a schema.
    pub fn schema(mut self, schema: impl Into<Schema>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Attach a default value used when the argument is omitted.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered parameters plus an optional result schema.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    params: Vec<Param>,
    result: Option<Schema>,
}

impl Signature {
    /// A signature with no parameters and no result schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Set the result schema.
    pub fn returns(mut self, schema: impl Into<Schema>) -> Self {
        self.result = Some(schema.into());
        self
    }

    /// Declared parameters in order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

/// Positional and keyword arguments of one call.
#[derive(Debug, Clone, Default)]
pub struct Args {
    positional: Vec<Value>,
    keyword: Vec<(String, Value)>,
}

impl Args {
    /// No arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.push((name.into(), value.into()));
        self
    }
}

/// Parameter name to value, in declaration order, defaults resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings {
    entries: Vec<(String, Value)>,
}

impl Bindings {
    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// All bindings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the signature has no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A function body guarded by schema checks.
pub struct Guard<F> {
    name: String,
    signature: Signature,
    body: F,
    checking: AtomicBool,
    validator: Validator,
}

impl<F> fmt::Debug for Guard<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("checking", &self.checking.load(Ordering::SeqCst))
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

impl<F> Guard<F>
where
    F: Fn(&Bindings) -> Value,
{
    /// Guard `body` with the default configuration.
    pub fn new(name: impl Into<String>, signature: Signature, body: F) -> Self {
        Self::with_config(name, signature, body, &CheckConfig::default())
    }

    /// Guard `body`; `config.enabled` seeds the guard's own flag.
    pub fn with_config(
        name: impl Into<String>,
        signature: Signature,
        body: F,
        config: &CheckConfig,
    ) -> Self {
        Self {
            name: name.into(),
            signature,
            body,
            checking: AtomicBool::new(config.enabled),
            validator: Validator::new(config),
        }
    }

    /// The guarded function's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Turn checking on or off for this guard only.
    pub fn set_checking(&self, on: bool) {
        self.checking.store(on, Ordering::SeqCst);
    }

    /// Whether this guard's own flag is on.
    pub fn is_checking(&self) -> bool {
        self.checking.load(Ordering::SeqCst)
    }

    /// Bind `args` to the signature, filling defaults.
    ///
    /// # Errors
    ///
    /// [`BindError`] on surplus positionals, unknown or repeated keywords,
    /// or a parameter left without value or default.
    pub fn bind(&self, args: Args) -> Result<Bindings, BindError> {
        let params = self.signature.params();
        if args.positional.len() > params.len() {
            return Err(BindError::TooManyPositional {
                function: self.name.clone(),
                expected: params.len(),
                given: args.positional.len(),
            });
        }

        let mut slots: Vec<Option<Value>> = args.positional.into_iter().map(Some).collect();
        slots.resize(params.len(), None);

        for (name, value) in args.keyword {
            let index = params
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| BindError::UnexpectedKeyword {
                    function: self.name.clone(),
                    name: name.clone(),
                })?;
            if slots[index].is_some() {
                return Err(BindError::DuplicateArgument {
                    function: self.name.clone(),
                    name,
                });
            }
            slots[index] = Some(value);
        }

        let entries = params
            .iter()
            .zip(slots)
            .map(|(param, slot)| {
                slot.or_else(|| param.default.clone())
                    .map(|value| (param.name.clone(), value))
                    .ok_or_else(|| BindError::MissingArgument {
                        function: self.name.clone(),
                        name: param.name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Bindings { entries })
    }

    /// Bind, check arguments, run the body, check the result.
    ///
    /// # Errors
    ///
    /// [`CallError::Bind`] if the arguments do not fit the signature,
    /// [`CallError::Violation`] on the first failed check.
    pub fn call(&self, args: Args) -> Result<Value, CallError> {
        let bindings = self.bind(args)?;

        if !(global_checking() && self.is_checking()) {
            tracing::debug!(function = %self.name, "checking disabled, calling unchecked");
            return Ok((self.body)(&bindings));
        }

        for (param, (_, value)) in self.signature.params.iter().zip(&bindings.entries) {
            if let Some(schema) = &param.schema {
                self.validator
                    .validate(&ParamId::named(param.name.as_str()), schema, value)?;
            }
        }

        let result = (self.body)(&bindings);

        if let Some(schema) = &self.signature.result {
            self.validator.validate(&ParamId::Return, schema, &result)?;
        }
        Ok(result)
    }
}
