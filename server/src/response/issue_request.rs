use crate::controller::Exhaust;
use application::transfer::RequestDto;
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct RequestResponse {
    id: Uuid,
    isbn: String,
    lib_id: i64,
    reader_id: i64,
    request_type: String,
    #[serde(with = "time::serde::rfc3339")]
    requested_at: OffsetDateTime,
    status: String,
    #[serde(with = "time::serde::rfc3339::option")]
    decided_at: Option<OffsetDateTime>,
}

impl From<RequestDto> for RequestResponse {
    fn from(value: RequestDto) -> Self {
        let RequestDto {
            id,
            isbn,
            lib_id,
            reader_id,
            request_type,
            requested_at,
            status,
            decided_at,
        } = value;
        Self {
            id,
            isbn,
            lib_id,
            reader_id,
            request_type,
            requested_at,
            status,
            decided_at,
        }
    }
}

pub struct RequestPresenter;

impl Exhaust<RequestDto> for RequestPresenter {
    type To = Json<RequestResponse>;
    fn emit(&self, input: RequestDto) -> Self::To {
        Json(RequestResponse::from(input))
    }
}

impl Exhaust<Vec<RequestDto>> for RequestPresenter {
    type To = Json<Vec<RequestResponse>>;
    fn emit(&self, input: Vec<RequestDto>) -> Self::To {
        Json(input.into_iter().map(RequestResponse::from).collect())
    }
}
