use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::gate::Capability;
use kernel::interface::query::{BookQuery, DependOnBookQuery, DependOnIssueQuery, IssueQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    Actor, Book, BookAuthors, BookMetadata, BookPatch, BookPublisher, BookTitle, BookVersion,
    CopyCount, Isbn,
};
use kernel::KernelError;

use crate::transfer::{AddCopiesDto, BookDto, GetBookDto, RemoveCopiesDto, UpdateBookDto};

#[async_trait::async_trait]
pub trait GetBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery + DependOnIssueQuery
{
    async fn get_book(
        &self,
        actor: &Actor,
        dto: GetBookDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        let lib_id = actor.lib_id();
        Capability::VIEW_CATALOG.check(actor, lib_id)?;
        let mut connection = self.database_connection().transact().await?;

        let isbn = Isbn::new(dto.isbn);
        let Some(book) = self
            .book_query()
            .find_by_isbn(&mut connection, lib_id, &isbn)
            .await?
        else {
            return Ok(None);
        };

        let earliest = if book.available_copies().is_exhausted() {
            self.issue_query()
                .find_earliest_return(&mut connection, lib_id, &isbn)
                .await?
        } else {
            None
        };
        Ok(Some(BookDto::from(book).with_earliest_return(earliest)))
    }
}

impl<T> GetBookService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnIssueQuery
{
}

#[async_trait::async_trait]
pub trait AddCopiesService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
    async fn add_copies(
        &self,
        actor: &Actor,
        dto: AddCopiesDto,
    ) -> error_stack::Result<BookDto, KernelError> {
        let lib_id = actor.lib_id();
        Capability::MANAGE_CATALOG.check(actor, lib_id)?;
        let count = CopyCount::new(dto.copies)?;
        if dto.isbn.trim().is_empty() {
            return Err(Report::new(KernelError::Validation).attach_printable("isbn is blank"));
        }
        let mut connection = self.database_connection().transact().await?;

        let isbn = Isbn::new(dto.isbn);
        let stored = self
            .book_query()
            .find_by_isbn_for_update(&mut connection, lib_id, &isbn)
            .await?;
        let book = match stored {
            Some(book) => {
                let book = book.add_copies(count)?;
                self.book_modifier().update(&mut connection, &book).await?;
                book
            }
            None => {
                let title = dto
                    .title
                    .filter(|title| !title.trim().is_empty())
                    .ok_or_else(|| {
                        Report::new(KernelError::Validation).attach_printable(format!(
                            "title is required to catalog {}",
                            isbn.as_ref()
                        ))
                    })?;
                let metadata = BookMetadata {
                    title: BookTitle::new(title),
                    authors: BookAuthors::new(dto.authors.unwrap_or_default()),
                    publisher: BookPublisher::new(dto.publisher.unwrap_or_default()),
                    version: BookVersion::new(dto.version.unwrap_or_default()),
                };
                let book = Book::catalog(isbn, *lib_id, metadata, count);
                self.book_modifier().create(&mut connection, &book).await?
            }
        };
        connection.commit().await?;

        tracing::info!(
            "added {} copies of {} to library {}",
            count.as_ref(),
            book.isbn().as_ref(),
            lib_id.as_ref()
        );
        Ok(BookDto::from(book))
    }
}

impl<T> AddCopiesService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
}

#[async_trait::async_trait]
pub trait RemoveCopiesService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
    /// `None` once the last copy is gone and the book has left the catalog.
    async fn remove_copies(
        &self,
        actor: &Actor,
        dto: RemoveCopiesDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        let lib_id = actor.lib_id();
        Capability::MANAGE_CATALOG.check(actor, lib_id)?;
        let count = CopyCount::new(dto.copies)?;
        let mut connection = self.database_connection().transact().await?;

        let isbn = Isbn::new(dto.isbn);
        let book = self
            .book_query()
            .find_by_isbn_for_update(&mut connection, lib_id, &isbn)
            .await?
            .ok_or_else(|| not_found(&isbn))?;
        let book = book.remove_copies(count)?;

        let removed = if book.is_depleted() {
            self.book_modifier()
                .delete(&mut connection, lib_id, &isbn)
                .await?;
            None
        } else {
            self.book_modifier().update(&mut connection, &book).await?;
            Some(BookDto::from(book))
        };
        connection.commit().await?;

        tracing::info!(
            "removed {} copies of {} from library {}",
            count.as_ref(),
            isbn.as_ref(),
            lib_id.as_ref()
        );
        Ok(removed)
    }
}

impl<T> RemoveCopiesService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
}

#[async_trait::async_trait]
pub trait UpdateBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
    async fn update_book(
        &self,
        actor: &Actor,
        dto: UpdateBookDto,
    ) -> error_stack::Result<BookDto, KernelError> {
        let lib_id = actor.lib_id();
        Capability::MANAGE_CATALOG.check(actor, lib_id)?;
        let patch = BookPatch {
            title: dto.title.map(BookTitle::new),
            authors: dto.authors.map(BookAuthors::new),
            publisher: dto.publisher.map(BookPublisher::new),
            version: dto.version.map(BookVersion::new),
        };
        if patch.is_empty() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("nothing to update"));
        }
        if patch
            .title
            .as_ref()
            .is_some_and(|title| title.as_ref().trim().is_empty())
        {
            return Err(Report::new(KernelError::Validation).attach_printable("title is blank"));
        }
        let mut connection = self.database_connection().transact().await?;

        let isbn = Isbn::new(dto.isbn);
        let book = self
            .book_query()
            .find_by_isbn_for_update(&mut connection, lib_id, &isbn)
            .await?
            .ok_or_else(|| not_found(&isbn))?
            .apply(patch);
        self.book_modifier().update(&mut connection, &book).await?;
        connection.commit().await?;

        tracing::debug!("updated metadata of {}", isbn.as_ref());
        Ok(BookDto::from(book))
    }
}

impl<T> UpdateBookService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
}

pub(crate) fn not_found(isbn: &Isbn) -> Report<KernelError> {
    Report::new(KernelError::NotFound).attach_printable(format!("no book {}", isbn.as_ref()))
}

