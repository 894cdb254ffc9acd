//! # Composite Combinators
//!
//! `AndChecker` and `OrChecker` own an ordered list of sub-schemas and check
//! a value against each of them through the validator callback.
//!
//! - `AndChecker` short-circuits: the first failing sub-schema's violation is
//!   returned unchanged, with no message of its own.
//! - `OrChecker` is exhaustive: every alternative is tried, failures are
//!   counted, and it fails only when all of them failed. Its message names
//!   the checker and the trail it was entered with; the individual failures
//!   are kept on the violation for inspection but not rendered.
//!
//! An empty `AndChecker` accepts everything; an empty `OrChecker` rejects
//! everything.
//!
//! An `OrChecker` adds a silent level to the trail, so nested alternatives
//! count toward the depth cap. `DepthExceeded` from an alternative is not
//! recoverable and aborts the whole check.

use std::fmt;

use sigcheck_core::Value;

use crate::error::SchemaViolation;
use crate::schema::{Composite, Schema};
use crate::trail::{Frame, Trail};
use crate::validate::{ParamId, Validator};

fn write_checker(f: &mut fmt::Formatter<'_>, name: &str, schemas: &[Schema]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, schema) in schemas.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{schema}")?;
    }
    f.write_str(")")
}

/// Value must satisfy every listed schema.
#[derive(Debug, Clone)]
pub struct AndChecker {
    schemas: Vec<Schema>,
}

impl AndChecker {
    /// Build from sub-schemas in checking order.
    pub fn new(schemas: impl IntoIterator<Item = Schema>) -> Self {
        Self {
            schemas: schemas.into_iter().collect(),
        }
    }
}

impl fmt::Display for AndChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_checker(f, "AndChecker", &self.schemas)
    }
}

impl Composite for AndChecker {
    fn check(
        &self,
        validator: &Validator,
        param: &ParamId,
        value: &Value,
        trail: &Trail<'_>,
    ) -> Result<(), SchemaViolation> {
        for schema in &self.schemas {
            let step = trail.push(Frame::AndStep {
                schema,
                checker: self,
            });
            validator.validate_at(param, schema, value, &step)?;
        }
        Ok(())
    }
}

/// Value must satisfy at least one listed schema.
#[derive(Debug, Clone)]
pub struct OrChecker {
    schemas: Vec<Schema>,
}

impl OrChecker {
    /// Build from alternatives in checking order.
    pub fn new(schemas: impl IntoIterator<Item = Schema>) -> Self {
        Self {
            schemas: schemas.into_iter().collect(),
        }
    }
}

impl fmt::Display for OrChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_checker(f, "OrChecker", &self.schemas)
    }
}

impl Composite for OrChecker {
    fn check(
        &self,
        validator: &Validator,
        param: &ParamId,
        value: &Value,
        trail: &Trail<'_>,
    ) -> Result<(), SchemaViolation> {
        let inner = trail.descend();
        let mut attempts = Vec::new();
        for schema in &self.schemas {
            match validator.validate_at(param, schema, value, &inner) {
                Ok(()) => {}
                Err(limit @ SchemaViolation::DepthExceeded { .. }) => return Err(limit),
                Err(violation) => attempts.push(violation),
            }
        }

        if attempts.len() < self.schemas.len() {
            if !attempts.is_empty() {
                tracing::debug!(
                    param = %param,
                    failed = attempts.len(),
                    tried = self.schemas.len(),
                    "OrChecker recovered"
                );
            }
            return Ok(());
        }

        Err(SchemaViolation::CompositeExhausted {
            param: param.to_string(),
            value: value.repr(),
            combinator: "OrChecker".to_string(),
            checker: self.to_string(),
            trail: trail.to_string(),
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckConfig;
    use crate::error::ViolationKind;
    use crate::validate::validate;
    use sigcheck_core::ValueType;

    fn int() -> Schema {
        Schema::of(ValueType::Int)
    }

    fn str_() -> Schema {
        Schema::of(ValueType::Str)
    }

    fn p() -> ParamId {
        ParamId::named("p")
    }

    #[test]
    fn and_checker_passes_when_all_pass() {
        let schema = Schema::all_of([int(), Schema::of(ValueType::Object)]);
        assert!(validate(&p(), &schema, &Value::Int(4)).is_ok());
    }

    #[test]
    fn and_checker_returns_first_failure_verbatim() {
        let and = Schema::all_of([int(), str_()]);
        let value = Value::Float(2.5);
        let err = validate(&p(), &and, &value).unwrap_err();

        // Same failure as checking the first sub-schema on the same step.
        let checker = AndChecker::new([int(), str_()]);
        let root = Trail::root();
        let first = int();
        let step = root.push(Frame::AndStep {
            schema: &first,
            checker: &checker,
        });
        let direct = Validator::default()
            .validate_at(&p(), &first, &value, &step)
            .unwrap_err();
        assert_eq!(err, direct);
        assert_eq!(err.kind(), ViolationKind::TypeMismatch);
        assert_eq!(
            err.trail(),
            "AndChecker check: int while trying: AndChecker(int, str)\n"
        );
    }

    #[test]
    fn and_checker_contradiction_always_fails() {
        let and = Schema::all_of([int(), str_()]);
        for v in [Value::Int(1), Value::from("a"), Value::None] {
            assert!(validate(&p(), &and, &v).is_err());
        }
    }

    #[test]
    fn or_checker_recovers_on_later_alternative() {
        let or = Schema::any_of([int(), str_()]);
        assert!(validate(&p(), &or, &Value::from("x")).is_ok());
        assert!(validate(&p(), &or, &Value::Int(1)).is_ok());
    }

    #[test]
    fn or_checker_exhaustion_names_checker() {
        let or = Schema::any_of([int(), str_()]);
        let err = validate(&p(), &or, &Value::Float(2.5)).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::CompositeExhausted);
        assert_eq!(
            err.to_string(),
            "'p' failed annotation check(OrChecker): value = 2.5\n  tried OrChecker(int, str)\n"
        );
        assert_eq!(err.attempts().len(), 2);
        assert!(err
            .attempts()
            .iter()
            .all(|a| a.kind() == ViolationKind::TypeMismatch));
    }

    #[test]
    fn or_checker_keeps_entry_trail() {
        let schema = Schema::list_of(Schema::any_of([int(), str_()]));
        let value = Value::list([Value::Int(1), Value::None]);
        let err = validate(&p(), &schema, &value).unwrap_err();
        assert_eq!(err.trail(), "list[1] check: OrChecker(int, str)\n");
    }

    #[test]
    fn empty_combinators() {
        assert!(validate(&p(), &Schema::all_of(Vec::new()), &Value::None).is_ok());
        let err = validate(&p(), &Schema::any_of(Vec::new()), &Value::None).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::CompositeExhausted);
    }

    #[test]
    fn nested_combinators() {
        // (int and object) or [str]
        let schema = Schema::any_of([
            Schema::all_of([int(), Schema::of(ValueType::Object)]),
            Schema::list_of(str_()),
        ]);
        assert!(validate(&p(), &schema, &Value::Bool(true)).is_ok());
        assert!(validate(&p(), &schema, &Value::list([Value::from("a")])).is_ok());
        assert!(validate(&p(), &schema, &Value::list([Value::Int(1)])).is_err());
    }

    #[test]
    fn nested_or_checkers_count_toward_depth() {
        let mut schema = int();
        for _ in 0..50 {
            schema = Schema::any_of([schema]);
        }
        let config = CheckConfig {
            max_depth: 4,
            ..CheckConfig::default()
        };
        let validator = Validator::new(&config);
        assert_eq!(validator.max_depth(), 4);

        let err = validator.validate(&p(), &schema, &Value::Int(1)).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::DepthExceeded);
        assert!(err.attempts().is_empty());
        assert!(Validator::default().validate(&p(), &schema, &Value::Int(1)).is_ok());
    }
}
