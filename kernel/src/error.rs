use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    /// Malformed or empty input.
    Validation,
    /// A referenced book, request or issue does not exist.
    NotFound,
    /// A state transition precondition does not hold.
    Conflict,
    /// No copy is left to reserve.
    Unavailable,
    /// The caller's role or library scope does not cover the target.
    Forbidden,
    Timeout,
    Persistence,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Validation => write!(f, "Validation error"),
            KernelError::NotFound => write!(f, "Resource not found"),
            KernelError::Conflict => write!(f, "Conflicting state"),
            KernelError::Unavailable => write!(f, "No copy available"),
            KernelError::Forbidden => write!(f, "Operation outside of caller scope"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Persistence => write!(f, "Persistence error"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
