use crate::database::{DependOnDatabaseConnection, Transaction, TransactionOf};
use crate::entity::{Book, Isbn, LibraryId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookModifier: 'static + Sync + Send {
    type Transaction: Transaction;

    /// Inserts `book`, or adds its copies to a row for the same library and ISBN
    /// committed since the caller looked. Returns the stored row.
    async fn create(
        &self,
        con: &mut Self::Transaction,
        book: &Book,
    ) -> error_stack::Result<Book, KernelError>;

    /// NotFound when the row is gone.
    async fn update(
        &self,
        con: &mut Self::Transaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError>;

    /// NotFound when the row is gone.
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<(), KernelError>;

    /// Takes one copy off the shelf in a single compare-and-decrement.
    /// `None` when the book is missing or no copy is left.
    async fn reserve_copy(
        &self,
        con: &mut Self::Transaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError>;

    /// Puts one copy back. `None` when the book is missing or already full.
    async fn release_copy(
        &self,
        con: &mut Self::Transaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError>;
}

pub trait DependOnBookModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookModifier: BookModifier<Transaction = TransactionOf<Self>>;
    fn book_modifier(&self) -> &Self::BookModifier;
}
