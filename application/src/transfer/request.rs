use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructIssueRequest, IssueRequest};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RequestDto {
    pub id: Uuid,
    pub isbn: String,
    pub lib_id: i64,
    pub reader_id: i64,
    pub request_type: String,
    pub requested_at: OffsetDateTime,
    pub status: String,
    pub decided_at: Option<OffsetDateTime>,
}

impl From<IssueRequest> for RequestDto {
    fn from(value: IssueRequest) -> Self {
        let DestructIssueRequest {
            id,
            isbn,
            lib_id,
            reader_id,
            request_type,
            requested_at,
            state,
        } = value.into_destruct();
        Self {
            id: id.into(),
            isbn: isbn.into(),
            lib_id: lib_id.into(),
            reader_id: reader_id.into(),
            request_type: request_type.to_string(),
            requested_at: requested_at.into(),
            status: state.name().to_string(),
            decided_at: state.decided_at(),
        }
    }
}

pub struct RaiseRequestDto {
    pub isbn: String,
}

pub struct DecideRequestDto {
    pub id: Uuid,
}

#[derive(Default)]
pub struct ListRequestsDto {
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}
