use crate::database::{DependOnDatabaseConnection, Transaction, TransactionOf};
use crate::entity::{IssueRequest, LibraryId, RequestId, SelectLimit, SelectOffset};
use crate::KernelError;

#[async_trait::async_trait]
pub trait RequestQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id_for_update(
        &self,
        con: &mut Self::Transaction,
        id: &RequestId,
    ) -> error_stack::Result<Option<IssueRequest>, KernelError>;

    /// Pending requests of a library, oldest first.
    async fn find_pending(
        &self,
        con: &mut Self::Transaction,
        lib_id: &LibraryId,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<IssueRequest>, KernelError>;
}

pub trait DependOnRequestQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type RequestQuery: RequestQuery<Transaction = TransactionOf<Self>>;
    fn request_query(&self) -> &Self::RequestQuery;
}
