//! # Validation Entry Point
//!
//! [`Validator::validate_at`] is the single recursive function every check
//! flows through. It classifies the schema and either
//!
//! 1. returns immediately (`Any`),
//! 2. performs an instance test (`Type`),
//! 3. runs the sequence shape checker, which recurses once per element,
//! 4. runs the mapping shape checker, which recurses once per key and value,
//! 5. hands control to a composite, which recurses once per sub-schema.
//!
//! Any failure aborts the enclosing checks; only an `OrChecker` catches
//! failures of its alternatives.
//!
//! ## Resource Limits
//!
//! Recursion depth follows schema nesting depth, which the caller controls.
//! Every recursive step, including ones that render no trail line, adds one
//! level of trail depth. Depth is capped at [`CheckConfig::max_depth`]; a
//! deeper descent fails with `DepthExceeded` instead of exhausting the stack.

use std::fmt;

use sigcheck_core::Value;

use crate::config::CheckConfig;
use crate::error::{SchemaViolation, ShapeProblem};
use crate::schema::{Schema, SequenceKind};
use crate::trail::{Frame, Trail};

/// Identity of the checked slot, used only in messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamId {
    /// A named parameter.
    Named(String),
    /// The value a call returned.
    Return,
}

impl ParamId {
    /// Identity of a named parameter.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Return => f.write_str("_return"),
        }
    }
}

/// The recursive schema-matching engine.
///
/// Holds no state that changes across checks: the same schema and value
/// always produce the same outcome and message, and a `Validator` can be
/// shared freely across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    max_depth: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&CheckConfig::default())
    }
}

impl Validator {
    /// A validator honouring `config`'s depth limit.
    pub fn new(config: &CheckConfig) -> Self {
        Self {
            max_depth: config.max_depth,
        }
    }

    /// The configured depth limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Check `value` against `schema` from an empty trail.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaViolation`] encountered.
    pub fn validate(
        &self,
        param: &ParamId,
        schema: &Schema,
        value: &Value,
    ) -> Result<(), SchemaViolation> {
        self.validate_at(param, schema, value, &Trail::root())
    }

    /// Check `value` against `schema`, continuing from `trail`.
    ///
    /// Composites call back into this to check their sub-schemas.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaViolation`] encountered.
    pub fn validate_at(
        &self,
        param: &ParamId,
        schema: &Schema,
        value: &Value,
        trail: &Trail<'_>,
    ) -> Result<(), SchemaViolation> {
        if trail.depth() > self.max_depth {
            return Err(SchemaViolation::DepthExceeded {
                param: param.to_string(),
                limit: self.max_depth,
                trail: trail.to_string(),
            });
        }

        tracing::trace!(param = %param, schema = %schema, depth = trail.depth(), "checking");

        let outcome = match schema {
            Schema::Any => Ok(()),
            Schema::Type(ty) => {
                if value.is_instance(ty) {
                    Ok(())
                } else {
                    Err(SchemaViolation::TypeMismatch {
                        param: param.to_string(),
                        value: value.repr(),
                        actual: value.type_name().to_string(),
                        expected: ty.to_string(),
                        trail: trail.to_string(),
                    })
                }
            }
            Schema::Sequence { kind, elements } => {
                self.check_sequence(param, *kind, schema, elements, value, trail)
            }
            Schema::Mapping(entries) => self.check_mapping(param, schema, entries, value, trail),
            Schema::Composite(checker) => checker.check(self, param, value, trail),
        };

        if let Err(violation) = &outcome {
            if trail.is_empty() {
                tracing::debug!(param = %param, kind = ?violation.kind(), "schema violation");
            }
        }
        outcome
    }

    fn check_sequence(
        &self,
        param: &ParamId,
        kind: SequenceKind,
        schema: &Schema,
        elements: &[Schema],
        value: &Value,
        trail: &Trail<'_>,
    ) -> Result<(), SchemaViolation> {
        let items = kind.elements(value).ok_or_else(|| SchemaViolation::ShapeMismatch {
            param: param.to_string(),
            value: value.repr(),
            problem: ShapeProblem::WrongContainer {
                actual: value.type_name().to_string(),
                expected: kind.value_type().to_string(),
            },
            trail: trail.to_string(),
        })?;

        if let [element] = elements {
            for (index, item) in items.iter().enumerate() {
                let nested = trail.push(Frame::Element {
                    kind,
                    index,
                    schema: element,
                });
                self.validate_at(param, element, item, &nested)?;
            }
            return Ok(());
        }

        if items.len() != elements.len() {
            return Err(SchemaViolation::ShapeMismatch {
                param: param.to_string(),
                value: value.repr(),
                problem: ShapeProblem::WrongLength {
                    expected: elements.len(),
                    actual: items.len(),
                    schema: schema.to_string(),
                },
                trail: trail.to_string(),
            });
        }

        for (index, (element, item)) in elements.iter().zip(items).enumerate() {
            let nested = trail.push(Frame::Position {
                kind,
                index,
                schema: element,
            });
            self.validate_at(param, element, item, &nested)?;
        }
        Ok(())
    }

    fn check_mapping(
        &self,
        param: &ParamId,
        schema: &Schema,
        entries: &[(Schema, Schema)],
        value: &Value,
        trail: &Trail<'_>,
    ) -> Result<(), SchemaViolation> {
        let pairs = value.as_dict().ok_or_else(|| SchemaViolation::ShapeMismatch {
            param: param.to_string(),
            value: value.repr(),
            problem: ShapeProblem::WrongContainer {
                actual: value.type_name().to_string(),
                expected: "dict".to_string(),
            },
            trail: trail.to_string(),
        })?;

        let [(key_schema, value_schema)] = entries else {
            return Err(SchemaViolation::MalformedSchema {
                param: param.to_string(),
                entries: entries.len(),
                schema: schema.to_string(),
                trail: trail.to_string(),
            });
        };

        for (key, val) in pairs {
            let key_trail = trail.push(Frame::DictKey(key_schema));
            self.validate_at(param, key_schema, key, &key_trail)?;
            let value_trail = trail.push(Frame::DictValue(value_schema));
            self.validate_at(param, value_schema, val, &value_trail)?;
        }
        Ok(())
    }
}

/// Check `value` against `schema` with the default configuration.
///
/// # Errors
///
/// Returns the first [`SchemaViolation`] encountered.
pub fn validate(param: &ParamId, schema: &Schema, value: &Value) -> Result<(), SchemaViolation> {
    Validator::default().validate(param, schema, value)
}
