use crate::controller::Exhaust;
use application::transfer::IssueDto;
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct IssueResponse {
    id: Uuid,
    isbn: String,
    lib_id: i64,
    reader_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    issued_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    expected_return_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    returned_at: Option<OffsetDateTime>,
    status: String,
}

impl From<IssueDto> for IssueResponse {
    fn from(value: IssueDto) -> Self {
        let IssueDto {
            id,
            isbn,
            lib_id,
            reader_id,
            issued_at,
            expected_return_at,
            returned_at,
            status,
        } = value;
        Self {
            id,
            isbn,
            lib_id,
            reader_id,
            issued_at,
            expected_return_at,
            returned_at,
            status,
        }
    }
}

pub struct IssuePresenter;

impl Exhaust<IssueDto> for IssuePresenter {
    type To = Json<IssueResponse>;
    fn emit(&self, input: IssueDto) -> Self::To {
        Json(IssueResponse::from(input))
    }
}

impl Exhaust<Vec<IssueDto>> for IssuePresenter {
    type To = Json<Vec<IssueResponse>>;
    fn emit(&self, input: Vec<IssueDto>) -> Self::To {
        Json(input.into_iter().map(IssueResponse::from).collect())
    }
}
