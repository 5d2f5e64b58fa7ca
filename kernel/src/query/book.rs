use crate::database::{DependOnDatabaseConnection, Transaction, TransactionOf};
use crate::entity::{Book, Isbn, LibraryId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_isbn(
        &self,
        con: &mut Self::Transaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError>;

    /// Same as `find_by_isbn` but holds the row until the transaction ends.
    async fn find_by_isbn_for_update(
        &self,
        con: &mut Self::Transaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError>;
}

pub trait DependOnBookQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookQuery: BookQuery<Transaction = TransactionOf<Self>>;
    fn book_query(&self) -> &Self::BookQuery;
}
