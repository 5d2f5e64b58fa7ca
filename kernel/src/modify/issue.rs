use crate::database::{DependOnDatabaseConnection, Transaction, TransactionOf};
use crate::entity::Issue;
use crate::KernelError;

#[async_trait::async_trait]
pub trait IssueModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        issue: &Issue,
    ) -> error_stack::Result<(), KernelError>;

    /// NotFound when the row is gone.
    async fn update(
        &self,
        con: &mut Self::Transaction,
        issue: &Issue,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnIssueModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type IssueModifier: IssueModifier<Transaction = TransactionOf<Self>>;
    fn issue_modifier(&self) -> &Self::IssueModifier;
}
