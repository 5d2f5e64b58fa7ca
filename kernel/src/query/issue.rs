use crate::database::{DependOnDatabaseConnection, Transaction, TransactionOf};
use crate::entity::{ExpectedReturnAt, Isbn, Issue, LibraryId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait IssueQuery: 'static + Sync + Send {
    type Transaction: Transaction;

    /// The `Issued` entry of a reader for a book, if any.
    async fn find_outstanding(
        &self,
        con: &mut Self::Transaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
        reader_id: &UserId,
    ) -> error_stack::Result<Option<Issue>, KernelError>;

    async fn find_outstanding_for_update(
        &self,
        con: &mut Self::Transaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
        reader_id: &UserId,
    ) -> error_stack::Result<Option<Issue>, KernelError>;

    /// Newest first.
    async fn find_by_reader(
        &self,
        con: &mut Self::Transaction,
        lib_id: &LibraryId,
        reader_id: &UserId,
    ) -> error_stack::Result<Vec<Issue>, KernelError>;

    async fn find_earliest_return(
        &self,
        con: &mut Self::Transaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<ExpectedReturnAt>, KernelError>;
}

pub trait DependOnIssueQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type IssueQuery: IssueQuery<Transaction = TransactionOf<Self>>;
    fn issue_query(&self) -> &Self::IssueQuery;
}
