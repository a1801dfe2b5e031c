// (C) 2020 Brandon Lewis
//
// Closed error set for the interpreter.
//
// Unlike the teacher VM's `Error` enum (vm.rs), which is only ever
// `{:?}`-printed in tests, Forge's CLI needs a user-facing message
// ("Error: <message>"), so we derive Display via thiserror instead of
// hand-rolling match arms.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForgeError {
    #[error("{0}")]
    StackUnderflow(String),

    #[error("{0}")]
    InvalidOperation(String),

    #[error("{0}")]
    DivisionByZero(String),

    #[error("{0}")]
    MemoryError(String),
}

pub type Result<T> = std::result::Result<T, ForgeError>;

impl ForgeError {
    pub fn underflow(what: &str) -> ForgeError {
        ForgeError::StackUnderflow(what.to_string())
    }

    pub fn invalid(what: impl Into<String>) -> ForgeError {
        ForgeError::InvalidOperation(what.into())
    }

    pub fn div_zero(what: &str) -> ForgeError {
        ForgeError::DivisionByZero(what.to_string())
    }

    pub fn memory(what: impl Into<String>) -> ForgeError {
        ForgeError::MemoryError(what.into())
    }
}
