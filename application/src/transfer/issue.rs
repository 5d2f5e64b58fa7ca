use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructIssue, Issue};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct IssueDto {
    pub id: Uuid,
    pub isbn: String,
    pub lib_id: i64,
    pub reader_id: i64,
    pub issued_at: OffsetDateTime,
    pub expected_return_at: OffsetDateTime,
    pub returned_at: Option<OffsetDateTime>,
    pub status: String,
}

impl From<Issue> for IssueDto {
    fn from(value: Issue) -> Self {
        let DestructIssue {
            id,
            isbn,
            lib_id,
            reader_id,
            issued_at,
            expected_return_at,
            returned_at,
            status,
        } = value.into_destruct();
        Self {
            id: id.into(),
            isbn: isbn.into(),
            lib_id: lib_id.into(),
            reader_id: reader_id.into(),
            issued_at: issued_at.into(),
            expected_return_at: expected_return_at.into(),
            returned_at: returned_at.map(OffsetDateTime::from),
            status: status.to_string(),
        }
    }
}

/// `reader_id` defaults to the caller.
pub struct ReturnBookDto {
    pub isbn: String,
    pub reader_id: Option<i64>,
}

/// `reader_id` defaults to the caller.
pub struct ListIssuesDto {
    pub reader_id: Option<i64>,
}
