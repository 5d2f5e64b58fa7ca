use error_stack::{Report, ResultExt};
use kernel::KernelError;

pub mod config;
pub mod database;
pub mod error;

pub(crate) fn env(key: &str) -> error_stack::Result<String, KernelError> {
    dotenvy::var(key)
        .map_err(Report::from)
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| format!("Failed to read env: {key}"))
}

/// `None` when the variable is simply not set.
pub(crate) fn env_opt(key: &str) -> error_stack::Result<Option<String>, KernelError> {
    match dotenvy::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(None),
        Err(error) => Err(Report::from(error)
            .change_context(KernelError::Internal)
            .attach_printable(format!("Failed to read env: {key}"))),
    }
}
