use error_stack::{Report, ResultExt};
use kernel::prelude::entity::{LoanPolicy, DEFAULT_LOAN_PERIOD_DAYS};
use kernel::KernelError;

use crate::env_opt;

static LOAN_PERIOD_DAYS: &str = "LOAN_PERIOD_DAYS";
static SERVER_PORT: &str = "SERVER_PORT";

const DEFAULT_SERVER_PORT: u16 = 8080;

pub fn loan_policy() -> error_stack::Result<LoanPolicy, KernelError> {
    let days = match env_opt(LOAN_PERIOD_DAYS)? {
        None => DEFAULT_LOAN_PERIOD_DAYS,
        Some(raw) => parse(LOAN_PERIOD_DAYS, &raw)?,
    };
    LoanPolicy::new(days).change_context_lazy(|| KernelError::Internal)
}

pub fn server_port() -> error_stack::Result<u16, KernelError> {
    match env_opt(SERVER_PORT)? {
        None => Ok(DEFAULT_SERVER_PORT),
        Some(raw) => parse(SERVER_PORT, &raw),
    }
}

fn parse<T>(key: &str, raw: &str) -> error_stack::Result<T, KernelError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .map_err(Report::from)
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| format!("{key} is not a valid value: {raw}"))
}
