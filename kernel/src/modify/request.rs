use crate::database::{DependOnDatabaseConnection, Transaction, TransactionOf};
use crate::entity::IssueRequest;
use crate::KernelError;

#[async_trait::async_trait]
pub trait RequestModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        request: &IssueRequest,
    ) -> error_stack::Result<(), KernelError>;

    /// NotFound when the row is gone.
    async fn update(
        &self,
        con: &mut Self::Transaction,
        request: &IssueRequest,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnRequestModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type RequestModifier: RequestModifier<Transaction = TransactionOf<Self>>;
    fn request_modifier(&self) -> &Self::RequestModifier;
}
