use time::OffsetDateTime;

use kernel::prelude::entity::{Book, DestructBook, ExpectedReturnAt};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookDto {
    pub isbn: String,
    pub lib_id: i64,
    pub title: String,
    pub authors: String,
    pub publisher: String,
    pub version: String,
    pub total_copies: i32,
    pub available_copies: i32,
    /// Only set while every copy is on loan.
    pub earliest_return: Option<OffsetDateTime>,
}

impl BookDto {
    pub(crate) fn with_earliest_return(mut self, at: Option<ExpectedReturnAt>) -> Self {
        self.earliest_return = at.map(OffsetDateTime::from);
        self
    }
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            isbn,
            lib_id,
            title,
            authors,
            publisher,
            version,
            total_copies,
            available_copies,
        } = value.into_destruct();
        Self {
            isbn: isbn.into(),
            lib_id: lib_id.into(),
            title: title.into(),
            authors: authors.into(),
            publisher: publisher.into(),
            version: version.into(),
            total_copies: total_copies.into(),
            available_copies: available_copies.into(),
            earliest_return: None,
        }
    }
}

pub struct GetBookDto {
    pub isbn: String,
}

/// Metadata is only read when the book is not in the catalog yet.
pub struct AddCopiesDto {
    pub isbn: String,
    pub copies: i32,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub publisher: Option<String>,
    pub version: Option<String>,
}

pub struct RemoveCopiesDto {
    pub isbn: String,
    pub copies: i32,
}

pub struct UpdateBookDto {
    pub isbn: String,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub publisher: Option<String>,
    pub version: Option<String>,
}
