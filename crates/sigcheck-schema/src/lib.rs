//! # sigcheck-schema — Call-Boundary Schema Validation
//!
//! Checks values against structural schemas before a function runs (its
//! arguments) and after (its result). Schemas are data: type markers,
//! list/tuple/dict shapes, and composite objects that combine sub-schemas.
//!
//! ## Engine (`validate`)
//!
//! [`Validator::validate_at`] classifies a [`Schema`] and recurses through
//! the sequence and mapping shape checkers and through [`Composite`]
//! implementers. Each descent extends a [`Trail`]; a failure renders the
//! trail into its message so its position in a nested schema is visible
//! without re-running the check.
//!
//! ## Combinators (`combinators`)
//!
//! [`AndChecker`] (every schema, short-circuit) and [`OrChecker`] (any
//! schema, exhaustive) are the built-in composites. User code adds more by
//! implementing [`Composite`].
//!
//! ## Documents and Guards
//!
//! [`SchemaDocument`] classifies JSON/YAML schema text into a [`Schema`].
//! [`Guard`] binds call arguments to a [`Signature`] and runs the checks
//! around a function body, gated by a process-wide and a per-guard flag.
//!
//! ## Crate Policy
//!
//! - Depends only on `sigcheck-core` internally.
//! - Schemas are immutable once built; validation holds no mutable state
//!   and is safe to run concurrently.
//! - The only resource a schema can exhaust is recursion depth, capped by
//!   [`CheckConfig::max_depth`].

pub mod combinators;
pub mod config;
pub mod document;
pub mod error;
pub mod guard;
pub mod schema;
pub mod trail;
pub mod validate;

pub use combinators::{AndChecker, OrChecker};
pub use config::{CheckConfig, ConfigError};
pub use document::{SchemaDocument, SchemaLoadError};
pub use error::{SchemaViolation, ShapeProblem, ViolationKind};
pub use guard::{
    global_checking, set_global_checking, Args, BindError, Bindings, CallError, Guard, Param,
    Signature,
};
pub use schema::{Composite, Schema, SequenceKind};
pub use trail::{Frame, Trail};
pub use validate::{validate, ParamId, Validator};
