use error_stack::Report;
use sqlx::PgConnection;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    AvailableCopies, Book, BookAuthors, BookPublisher, BookTitle, BookVersion, Isbn, LibraryId,
    TotalCopies,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_isbn(
        &self,
        con: &mut PostgresTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_isbn(con, lib_id, isbn, false).await
    }

    async fn find_by_isbn_for_update(
        &self,
        con: &mut PostgresTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_isbn(con, lib_id, isbn, true).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<Book, KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update(con, book).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, lib_id, isbn).await
    }

    async fn reserve_copy(
        &self,
        con: &mut PostgresTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::reserve_copy(con, lib_id, isbn).await
    }

    async fn release_copy(
        &self,
        con: &mut PostgresTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::release_copy(con, lib_id, isbn).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    isbn: String,
    lib_id: i64,
    title: String,
    authors: String,
    publisher: String,
    version: String,
    total_copies: i32,
    available_copies: i32,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            Isbn::new(value.isbn),
            LibraryId::new(value.lib_id),
            BookTitle::new(value.title),
            BookAuthors::new(value.authors),
            BookPublisher::new(value.publisher),
            BookVersion::new(value.version),
            TotalCopies::new(value.total_copies),
            AvailableCopies::new(value.available_copies),
        )
    }
}

fn ensure_touched(rows: u64, isbn: &Isbn) -> error_stack::Result<(), KernelError> {
    if rows == 0 {
        return Err(Report::new(KernelError::NotFound)
            .attach_printable(format!("book {} is not in the catalog", isbn.as_ref())));
    }
    Ok(())
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_isbn(
        con: &mut PgConnection,
        lib_id: &LibraryId,
        isbn: &Isbn,
        lock: bool,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let query = if lock {
            // language=postgresql
            r#"
            SELECT isbn, lib_id, title, authors, publisher, version, total_copies, available_copies
            FROM books
            WHERE lib_id = $1 AND isbn = $2
            FOR UPDATE
            "#
        } else {
            // language=postgresql
            r#"
            SELECT isbn, lib_id, title, authors, publisher, version, total_copies, available_copies
            FROM books
            WHERE lib_id = $1 AND isbn = $2
            "#
        };
        let row = sqlx::query_as::<_, BookRow>(query)
            .bind(lib_id.as_ref())
            .bind(isbn.as_ref())
            .fetch_optional(con)
            .await
            .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn create(con: &mut PgConnection, book: &Book) -> error_stack::Result<Book, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            INSERT INTO books (isbn, lib_id, title, authors, publisher, version, total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (lib_id, isbn) DO UPDATE
            SET total_copies = books.total_copies + EXCLUDED.total_copies,
                available_copies = books.available_copies + EXCLUDED.available_copies
            RETURNING isbn, lib_id, title, authors, publisher, version, total_copies, available_copies
            "#,
        )
        .bind(book.isbn().as_ref())
        .bind(book.lib_id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.authors().as_ref())
        .bind(book.publisher().as_ref())
        .bind(book.version().as_ref())
        .bind(book.total_copies().as_ref())
        .bind(book.available_copies().as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(Book::from(row))
    }

    async fn update(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE books
            SET title = $3, authors = $4, publisher = $5, version = $6,
                total_copies = $7, available_copies = $8
            WHERE lib_id = $1 AND isbn = $2
            "#,
        )
        .bind(book.lib_id().as_ref())
        .bind(book.isbn().as_ref())
        .bind(book.title().as_ref())
        .bind(book.authors().as_ref())
        .bind(book.publisher().as_ref())
        .bind(book.version().as_ref())
        .bind(book.total_copies().as_ref())
        .bind(book.available_copies().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        ensure_touched(result.rows_affected(), book.isbn())
    }

    async fn delete(
        con: &mut PgConnection,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM books
            WHERE lib_id = $1 AND isbn = $2
            "#,
        )
        .bind(lib_id.as_ref())
        .bind(isbn.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        ensure_touched(result.rows_affected(), isbn)
    }

    async fn reserve_copy(
        con: &mut PgConnection,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            UPDATE books
            SET available_copies = available_copies - 1
            WHERE lib_id = $1 AND isbn = $2 AND available_copies > 0
            RETURNING isbn, lib_id, title, authors, publisher, version, total_copies, available_copies
            "#,
        )
        .bind(lib_id.as_ref())
        .bind(isbn.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn release_copy(
        con: &mut PgConnection,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            UPDATE books
            SET available_copies = available_copies + 1
            WHERE lib_id = $1 AND isbn = $2 AND available_copies < total_copies
            RETURNING isbn, lib_id, title, authors, publisher, version, total_copies, available_copies
            "#,
        )
        .bind(lib_id.as_ref())
        .bind(isbn.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }
}
