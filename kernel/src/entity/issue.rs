mod dates;
mod id;
mod status;

pub use self::{dates::*, id::*, status::*};
use crate::entity::{Isbn, LibraryId, LoanPolicy, UserId};
use crate::KernelError;
use destructure::Destructure;
use error_stack::Report;
use time::OffsetDateTime;
use vodca::References;

/// One physical loan. Entries are never deleted; a returned loan stays as history.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Issue {
    id: IssueId,
    isbn: Isbn,
    lib_id: LibraryId,
    reader_id: UserId,
    issued_at: IssuedAt,
    expected_return_at: ExpectedReturnAt,
    returned_at: Option<ReturnedAt>,
    status: IssueStatus,
}

impl Issue {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: IssueId,
        isbn: Isbn,
        lib_id: LibraryId,
        reader_id: UserId,
        issued_at: IssuedAt,
        expected_return_at: ExpectedReturnAt,
        returned_at: Option<ReturnedAt>,
        status: IssueStatus,
    ) -> Self {
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

    /// Opens an outstanding loan due one loan period after `now`.
    pub fn lend(
        id: IssueId,
        isbn: Isbn,
        lib_id: LibraryId,
        reader_id: UserId,
        now: OffsetDateTime,
        policy: &LoanPolicy,
    ) -> error_stack::Result<Self, KernelError> {
        let due = now.checked_add(policy.loan_period()).ok_or_else(|| {
            Report::new(KernelError::Validation)
                .attach_printable(format!("due date of a loan issued at {now} is out of range"))
        })?;
        Ok(Self::new(
            id,
            isbn,
            lib_id,
            reader_id,
            IssuedAt::new(now),
            ExpectedReturnAt::new(due),
            None,
            IssueStatus::Issued,
        ))
    }

    pub fn is_outstanding(&self) -> bool {
        self.status == IssueStatus::Issued
    }

    pub fn mark_returned(mut self, now: OffsetDateTime) -> error_stack::Result<Self, KernelError> {
        if !self.is_outstanding() {
            return Err(Report::new(KernelError::Conflict)
                .attach_printable(format!("issue {} was already returned", self.id.as_ref())));
        }
        self.returned_at = Some(ReturnedAt::new(now));
        self.status = IssueStatus::Returned;
        Ok(self)
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;
    use time::PrimitiveDateTime;
    use uuid::Uuid;

    use crate::entity::{
        ExpectedReturnAt, Isbn, Issue, IssueId, IssueStatus, LibraryId, LoanPolicy, ReturnedAt,
        UserId,
    };
    use crate::KernelError;

    fn lend() -> Issue {
        Issue::lend(
            IssueId::new(Uuid::new_v4()),
            Isbn::new("X"),
            LibraryId::new(1),
            UserId::new(7),
            datetime!(2024-03-01 10:00 UTC),
            &LoanPolicy::new(14).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn lend_is_due_after_the_loan_period() {
        let issue = lend();
        assert!(issue.is_outstanding());
        assert_eq!(
            issue.expected_return_at(),
            &ExpectedReturnAt::new(datetime!(2024-03-15 10:00 UTC))
        );
        assert!(issue.returned_at().is_none());
    }

    #[test]
    fn due_date_past_the_calendar_is_refused() {
        let report = Issue::lend(
            IssueId::new(Uuid::new_v4()),
            Isbn::new("X"),
            LibraryId::new(1),
            UserId::new(7),
            PrimitiveDateTime::MAX.assume_utc(),
            &LoanPolicy::new(1).unwrap(),
        )
        .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Validation);
    }

    #[test]
    fn return_closes_the_loan_once() {
        let now = datetime!(2024-03-10 09:30 UTC);
        let returned = lend().mark_returned(now).unwrap();
        assert_eq!(returned.status(), &IssueStatus::Returned);
        assert_eq!(returned.returned_at(), &Some(ReturnedAt::new(now)));

        let report = returned.mark_returned(now).unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Conflict);
    }
}
