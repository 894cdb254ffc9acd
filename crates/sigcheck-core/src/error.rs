//! # Error Types
//!
//! Errors raised while building the value model: resolving type names and
//! registering user classes. Validation failures live in `sigcheck-schema`.

use thiserror::Error;

/// Error in the runtime value model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A type name did not resolve to a builtin or registered class.
    #[error("unknown type name: '{0}'")]
    UnknownType(String),

    /// A class was registered twice under the same name.
    #[error("class '{0}' is already registered")]
    DuplicateClass(String),

    /// A class named a parent that has not been registered.
    #[error("class '{class}' names unregistered parent '{parent}'")]
    UnknownParent {
        /// The class being registered.
        class: String,
        /// The parent it referred to.
        parent: String,
    },
}
