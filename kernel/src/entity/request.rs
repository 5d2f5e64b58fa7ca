mod id;
mod kind;
mod state;

pub use self::{id::*, kind::*, state::*};
use crate::entity::{Isbn, LibraryId, UserId};
use crate::KernelError;
use destructure::Destructure;
use error_stack::Report;
use time::OffsetDateTime;
use vodca::References;

/// A reader's ask to borrow a book, waiting for an admin decision.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct IssueRequest {
    id: RequestId,
    isbn: Isbn,
    lib_id: LibraryId,
    reader_id: UserId,
    request_type: RequestType,
    requested_at: RequestedAt,
    state: RequestState,
}

impl IssueRequest {
    pub fn new(
        id: RequestId,
        isbn: Isbn,
        lib_id: LibraryId,
        reader_id: UserId,
        request_type: RequestType,
        requested_at: RequestedAt,
        state: RequestState,
    ) -> Self {
        Self {
            id,
            isbn,
            lib_id,
            reader_id,
            request_type,
            requested_at,
            state,
        }
    }

    pub fn raise(
        id: RequestId,
        isbn: Isbn,
        lib_id: LibraryId,
        reader_id: UserId,
        now: OffsetDateTime,
    ) -> Self {
        Self::new(
            id,
            isbn,
            lib_id,
            reader_id,
            RequestType::IssueRequest,
            RequestedAt::new(now),
            RequestState::Pending,
        )
    }

    pub fn approve(self, now: OffsetDateTime) -> error_stack::Result<Self, KernelError> {
        self.transit(RequestState::Approved { at: now })
    }

    pub fn reject(self, now: OffsetDateTime) -> error_stack::Result<Self, KernelError> {
        self.transit(RequestState::Rejected { at: now })
    }

    fn transit(mut self, next: RequestState) -> error_stack::Result<Self, KernelError> {
        match (self.state, next) {
            (RequestState::Pending, RequestState::Approved { .. })
            | (RequestState::Pending, RequestState::Rejected { .. }) => {
                self.state = next;
                Ok(self)
            }
            (current, next) => Err(Report::new(KernelError::Conflict).attach_printable(format!(
                "request {} cannot move from {} to {}",
                self.id.as_ref(),
                current.name(),
                next.name()
            ))),
        }
    }
}
