use crate::controller::Intake;
use application::transfer::{ListIssuesDto, ReturnBookDto};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ReturnBookRequest {
    isbn: String,
    reader_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ListIssuesRequest {
    reader_id: Option<i64>,
}

pub struct IssueTransformer;

impl Intake<ReturnBookRequest> for IssueTransformer {
    type To = ReturnBookDto;
    fn emit(&self, input: ReturnBookRequest) -> Self::To {
        ReturnBookDto {
            isbn: input.isbn,
            reader_id: input.reader_id,
        }
    }
}

impl Intake<ListIssuesRequest> for IssueTransformer {
    type To = ListIssuesDto;
    fn emit(&self, input: ListIssuesRequest) -> Self::To {
        ListIssuesDto {
            reader_id: input.reader_id,
        }
    }
}
