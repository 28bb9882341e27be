//! Typed failures surfaced by the object model and the dispatch engine.
//!
//! The `Display` form of every variant is the exact guest-visible message,
//! so existing guest programs and tooling can match on it.

use thiserror::Error;

use crate::val::Kind;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Wrong classification passed to a raw primitive or built-in.
    #[error("{0}")]
    Argument(String),

    /// No raw path applies and no metamethod resolved.
    #[error("{0}")]
    Operation(String),

    /// Numeric argument outside its accepted range.
    #[error("{0}")]
    Range(String),

    /// Raised by guest code; passed through dispatch untouched.
    #[error("{0}")]
    Guest(String),

    #[error("global namespace is already installed")]
    GlobalsInstalled,
}

impl RuntimeError {
    pub fn bad_argument(position: usize, func: &str, detail: impl AsRef<str>) -> Self {
        RuntimeError::Argument(format!("bad argument #{position} to '{func}' ({})", detail.as_ref()))
    }

    pub fn expected(position: usize, func: &str, expected: &str, got: Kind) -> Self {
        Self::bad_argument(position, func, format!("{expected} expected, got {got}"))
    }

    pub(crate) fn attempt(action: &str, kind: Kind) -> Self {
        RuntimeError::Operation(format!("attempt to {action} a {kind} value"))
    }

    pub(crate) fn compare(a: Kind, b: Kind) -> Self {
        if a == b {
            RuntimeError::Operation(format!("attempt to compare two {a} values"))
        } else {
            RuntimeError::Operation(format!("attempt to compare {a} with {b}"))
        }
    }

    pub fn guest(msg: impl Into<String>) -> Self {
        RuntimeError::Guest(msg.into())
    }

    /// True for the `attempt to ...` family.
    pub fn is_operation(&self) -> bool {
        matches!(self, RuntimeError::Operation(_))
    }
}
