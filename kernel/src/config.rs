use crate::entity::LoanPolicy;

pub trait DependOnLoanPolicy: 'static + Sync + Send {
    fn loan_policy(&self) -> &LoanPolicy;
}
