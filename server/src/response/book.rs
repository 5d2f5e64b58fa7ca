use crate::controller::Exhaust;
use application::transfer::BookDto;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
pub struct BookResponse {
    isbn: String,
    lib_id: i64,
    title: String,
    authors: String,
    publisher: String,
    version: String,
    total_copies: i32,
    available_copies: i32,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    earliest_return: Option<OffsetDateTime>,
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (axum::http::StatusCode::OK, axum::Json(self)).into_response()
    }
}

impl From<BookDto> for BookResponse {
    fn from(value: BookDto) -> Self {
        let BookDto {
            isbn,
            lib_id,
            title,
            authors,
            publisher,
            version,
            total_copies,
            available_copies,
            earliest_return,
        } = value;
        Self {
            isbn,
            lib_id,
            title,
            authors,
            publisher,
            version,
            total_copies,
            available_copies,
            earliest_return,
        }
    }
}

pub struct BookPresenter;

impl Exhaust<BookDto> for BookPresenter {
    type To = BookResponse;
    fn emit(&self, input: BookDto) -> Self::To {
        BookResponse::from(input)
    }
}

impl Exhaust<Option<BookDto>> for BookPresenter {
    type To = Option<BookResponse>;
    fn emit(&self, input: Option<BookDto>) -> Self::To {
        input.map(BookResponse::from)
    }
}
