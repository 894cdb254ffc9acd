//! # Error Types — Validation Failures
//!
//! Every failure carries the parameter identity, the offending value's
//! representation, what was expected, and the materialized diagnostic trail,
//! so a failure deep inside a nested schema can be located from the message
//! alone.
//!
//! ## Design
//!
//! - Value failures (`TypeMismatch`, `ShapeMismatch`, `CompositeExhausted`,
//!   `Custom`) mean the value is wrong.
//! - `MalformedSchema` means the schema is wrong; [`SchemaViolation::is_schema_error`]
//!   tells the two apart.
//! - `DepthExceeded` guards the only resource a pathological schema can
//!   exhaust: recursion depth.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Why a container failed its shape check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeProblem {
    /// Wrong container kind.
    WrongContainer {
        /// Type name of the value.
        actual: String,
        /// Container type the schema requires.
        expected: String,
    },
    /// Fixed-arity sequence with the wrong number of elements.
    WrongLength {
        /// Number of element schemas.
        expected: usize,
        /// Number of elements in the value.
        actual: usize,
        /// Rendering of the full sequence schema.
        schema: String,
    },
}

impl ShapeProblem {
    /// Short label used in the message header.
    pub fn label(&self) -> &'static str {
        match self {
            Self::WrongContainer { .. } => "wrong type",
            Self::WrongLength { .. } => "wrong number of elements",
        }
    }
}

impl fmt::Display for ShapeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongContainer { actual, expected } => {
                write!(f, "was type {actual} ...should be type {expected}")
            }
            Self::WrongLength {
                expected,
                actual,
                schema,
            } => write!(
                f,
                "annotation had {expected} elements {schema} but value had {actual}"
            ),
        }
    }
}

/// Coarse classification of a [`SchemaViolation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    TypeMismatch,
    ShapeMismatch,
    MalformedSchema,
    CompositeExhausted,
    Custom,
    DepthExceeded,
}

/// A value (or schema) failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaViolation {
    /// The value is not an instance of the required type.
    #[error("'{param}' failed annotation check(wrong type): value = {value}\n  was type {actual} ...should be type {expected}\n{trail}")]
    TypeMismatch {
        /// Parameter identity.
        param: String,
        /// Representation of the offending value.
        value: String,
        /// Type name of the value.
        actual: String,
        /// Type the schema requires.
        expected: String,
        /// Rendered diagnostic trail.
        trail: String,
    },

    /// Wrong container kind or wrong number of elements.
    #[error("'{param}' failed annotation check({}): value = {value}\n  {problem}\n{trail}", .problem.label())]
    ShapeMismatch {
        /// Parameter identity.
        param: String,
        /// Representation of the offending value.
        value: String,
        /// What was wrong with the shape.
        problem: ShapeProblem,
        /// Rendered diagnostic trail.
        trail: String,
    },

    /// A mapping schema without exactly one entry.
    #[error("'{param}' annotation inconsistency: dict should have 1 item but had {entries}\n  annotation = {schema}\n{trail}")]
    MalformedSchema {
        /// Parameter identity.
        param: String,
        /// Number of entries the schema has.
        entries: usize,
        /// Rendering of the malformed schema.
        schema: String,
        /// Rendered diagnostic trail.
        trail: String,
    },

    /// Every alternative of an `OrChecker` failed.
    #[error("'{param}' failed annotation check({combinator}): value = {value}\n  tried {checker}\n{trail}")]
    CompositeExhausted {
        /// Parameter identity.
        param: String,
        /// Representation of the offending value.
        value: String,
        /// Name of the combinator.
        combinator: String,
        /// Rendering of the combinator with all its alternatives.
        checker: String,
        /// Rendered diagnostic trail.
        trail: String,
        /// The failure of each alternative, in order. Not part of the message.
        attempts: Vec<SchemaViolation>,
    },

    /// Failure reported by a user composite.
    #[error("'{param}' failed annotation check({message}): value = {value}\n{trail}")]
    Custom {
        /// Parameter identity.
        param: String,
        /// Representation of the offending value.
        value: String,
        /// What the composite rejected.
        message: String,
        /// Rendered diagnostic trail.
        trail: String,
    },

    /// Schema nesting deeper than the configured limit.
    #[error("'{param}' exceeded maximum schema depth {limit}\n{trail}")]
    DepthExceeded {
        /// Parameter identity.
        param: String,
        /// Configured limit.
        limit: usize,
        /// Rendered diagnostic trail.
        trail: String,
    },
}

impl SchemaViolation {
    /// Classification of this violation.
    pub fn kind(&self) -> ViolationKind {
        match self {
            Self::TypeMismatch { .. } => ViolationKind::TypeMismatch,
            Self::ShapeMismatch { .. } => ViolationKind::ShapeMismatch,
            Self::MalformedSchema { .. } => ViolationKind::MalformedSchema,
            Self::CompositeExhausted { .. } => ViolationKind::CompositeExhausted,
            Self::Custom { .. } => ViolationKind::Custom,
            Self::DepthExceeded { .. } => ViolationKind::DepthExceeded,
        }
    }

    /// True when the schema itself is at fault rather than the value.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::MalformedSchema { .. })
    }

    /// The parameter identity the violation was raised for.
    pub fn param(&self) -> &str {
        match self {
            Self::TypeMismatch { param, .. }
            | Self::ShapeMismatch { param, .. }
            | Self::MalformedSchema { param, .. }
            | Self::CompositeExhausted { param, .. }
            | Self::Custom { param, .. }
            | Self::DepthExceeded { param, .. } => param,
        }
    }

    /// The rendered trail at the point of failure.
    pub fn trail(&self) -> &str {
        match self {
            Self::TypeMismatch { trail, .. }
            | Self::ShapeMismatch { trail, .. }
            | Self::MalformedSchema { trail, .. }
            | Self::CompositeExhausted { trail, .. }
            | Self::Custom { trail, .. }
            | Self::DepthExceeded { trail, .. } => trail,
        }
    }

    /// Failures of the individual alternatives, for `CompositeExhausted`.
    pub fn attempts(&self) -> &[SchemaViolation] {
        match self {
            Self::CompositeExhausted { attempts, .. } => attempts,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_message_layout() {
        let v = SchemaViolation::TypeMismatch {
            param: "x".into(),
            value: "'a'".into(),
            actual: "str".into(),
            expected: "int".into(),
            trail: "list[0] check: int\n".into(),
        };
        assert_eq!(
            v.to_string(),
            "'x' failed annotation check(wrong type): value = 'a'\n  was type str ...should be type int\nlist[0] check: int\n"
        );
        assert_eq!(v.kind(), ViolationKind::TypeMismatch);
        assert!(!v.is_schema_error());
    }

    #[test]
    fn shape_mismatch_labels_the_problem() {
        let v = SchemaViolation::ShapeMismatch {
            param: "pair".into(),
            value: "(1, 2, 3)".into(),
            problem: ShapeProblem::WrongLength {
                expected: 2,
                actual: 3,
                schema: "(int, str)".into(),
            },
            trail: String::new(),
        };
        let msg = v.to_string();
        assert!(msg.starts_with("'pair' failed annotation check(wrong number of elements)"));
        assert!(msg.contains("annotation had 2 elements (int, str) but value had 3"));
    }

    #[test]
    fn malformed_schema_is_a_schema_error() {
        let v = SchemaViolation::MalformedSchema {
            param: "d".into(),
            entries: 2,
            schema: "{str: int, int: str}".into(),
            trail: String::new(),
        };
        assert!(v.is_schema_error());
        assert_eq!(v.kind(), ViolationKind::MalformedSchema);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ViolationKind::CompositeExhausted).unwrap();
        assert_eq!(json, "\"composite_exhausted\"");
    }
}
