use error_stack::Report;
use time::Duration;

use crate::KernelError;

pub const DEFAULT_LOAN_PERIOD_DAYS: i64 = 14;
pub const MAX_LOAN_PERIOD_DAYS: i64 = 3650;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct LoanPolicy {
    loan_period: Duration,
}

impl LoanPolicy {
    pub fn new(days: i64) -> error_stack::Result<Self, KernelError> {
        if !(1..=MAX_LOAN_PERIOD_DAYS).contains(&days) {
            return Err(Report::new(KernelError::Validation).attach_printable(format!(
                "loan period must be between 1 and {MAX_LOAN_PERIOD_DAYS} days, got {days}"
            )));
        }
        Ok(Self {
            loan_period: Duration::days(days),
        })
    }

    pub fn loan_period(&self) -> Duration {
        self.loan_period
    }
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            loan_period: Duration::days(DEFAULT_LOAN_PERIOD_DAYS),
        }
    }
}

#[cfg(test)]
mod test {
    use time::Duration;

    use crate::entity::{LoanPolicy, MAX_LOAN_PERIOD_DAYS};
    use crate::KernelError;

    #[test]
    fn loan_period_is_bounded() {
        let policy = LoanPolicy::new(MAX_LOAN_PERIOD_DAYS).unwrap();
        assert_eq!(policy.loan_period(), Duration::days(MAX_LOAN_PERIOD_DAYS));
        for days in [0, -1, MAX_LOAN_PERIOD_DAYS + 1, 100_000_000, i64::MAX] {
            let report = LoanPolicy::new(days).unwrap_err();
            assert_eq!(report.current_context(), &KernelError::Validation);
        }
    }
}
