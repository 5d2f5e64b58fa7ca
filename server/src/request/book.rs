use crate::controller::Intake;
use application::transfer::{AddCopiesDto, GetBookDto, RemoveCopiesDto, UpdateBookDto};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AddCopiesRequest {
    isbn: String,
    copies: i32,
    title: Option<String>,
    authors: Option<String>,
    publisher: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    title: Option<String>,
    authors: Option<String>,
    publisher: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveCopiesRequest {
    copies: i32,
}

#[derive(Debug)]
pub struct GetBookRequest {
    isbn: String,
}

impl GetBookRequest {
    pub fn new(isbn: String) -> Self {
        Self { isbn }
    }
}

pub struct BookTransformer;

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto { isbn: input.isbn }
    }
}

impl Intake<AddCopiesRequest> for BookTransformer {
    type To = AddCopiesDto;
    fn emit(&self, input: AddCopiesRequest) -> Self::To {
        AddCopiesDto {
            isbn: input.isbn,
            copies: input.copies,
            title: input.title,
            authors: input.authors,
            publisher: input.publisher,
            version: input.version,
        }
    }
}

impl Intake<(String, UpdateBookRequest)> for BookTransformer {
    type To = UpdateBookDto;
    fn emit(&self, input: (String, UpdateBookRequest)) -> Self::To {
        let (isbn, input) = input;
        UpdateBookDto {
            isbn,
            title: input.title,
            authors: input.authors,
            publisher: input.publisher,
            version: input.version,
        }
    }
}

impl Intake<(String, RemoveCopiesRequest)> for BookTransformer {
    type To = RemoveCopiesDto;
    fn emit(&self, input: (String, RemoveCopiesRequest)) -> Self::To {
        let (isbn, input) = input;
        RemoveCopiesDto {
            isbn,
            copies: input.copies,
        }
    }
}
