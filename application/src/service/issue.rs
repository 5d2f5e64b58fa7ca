use error_stack::Report;
use time::OffsetDateTime;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::gate::Capability;
use kernel::interface::query::{DependOnIssueQuery, IssueQuery};
use kernel::interface::update::{
    BookModifier, DependOnBookModifier, DependOnIssueModifier, IssueModifier,
};
use kernel::prelude::entity::{Actor, Isbn, UserId};
use kernel::KernelError;

use crate::transfer::{IssueDto, ListIssuesDto, ReturnBookDto};

#[async_trait::async_trait]
pub trait ReturnBookService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnIssueQuery
    + DependOnIssueModifier
    + DependOnBookModifier
{
    async fn return_book(
        &self,
        actor: &Actor,
        dto: ReturnBookDto,
    ) -> error_stack::Result<IssueDto, KernelError> {
        let lib_id = actor.lib_id();
        let reader_id = dto.reader_id.map(UserId::new).unwrap_or(*actor.id());
        Capability::RETURN_BOOK.check_on_behalf(actor, lib_id, &reader_id)?;
        let mut connection = self.database_connection().transact().await?;

        let isbn = Isbn::new(dto.isbn);
        let issue = self
            .issue_query()
            .find_outstanding_for_update(&mut connection, lib_id, &isbn, &reader_id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound).attach_printable(format!(
                    "reader {} holds no copy of {}",
                    reader_id.as_ref(),
                    isbn.as_ref()
                ))
            })?;
        let issue = issue.mark_returned(OffsetDateTime::now_utc())?;
        self.issue_modifier().update(&mut connection, &issue).await?;

        let released = self
            .book_modifier()
            .release_copy(&mut connection, lib_id, &isbn)
            .await?;
        if released.is_none() {
            tracing::warn!(
                "copy counter of {} is already full, return of {} refused",
                isbn.as_ref(),
                issue.id().as_ref()
            );
            return Err(Report::new(KernelError::Conflict).attach_printable(format!(
                "every copy of {} is already on the shelf",
                isbn.as_ref()
            )));
        }
        connection.commit().await?;

        tracing::info!(
            "reader {} returned {}",
            reader_id.as_ref(),
            isbn.as_ref()
        );
        Ok(IssueDto::from(issue))
    }
}

impl<T> ReturnBookService for T where
    T: DependOnDatabaseConnection
        + DependOnIssueQuery
        + DependOnIssueModifier
        + DependOnBookModifier
{
}

#[async_trait::async_trait]
pub trait ListIssuesService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnIssueQuery
{
    async fn list_issues(
        &self,
        actor: &Actor,
        dto: ListIssuesDto,
    ) -> error_stack::Result<Vec<IssueDto>, KernelError> {
        let lib_id = actor.lib_id();
        let reader_id = dto.reader_id.map(UserId::new).unwrap_or(*actor.id());
        Capability::VIEW_ISSUES.check_on_behalf(actor, lib_id, &reader_id)?;
        let mut connection = self.database_connection().transact().await?;

        let issues = self
            .issue_query()
            .find_by_reader(&mut connection, lib_id, &reader_id)
            .await?;
        Ok(issues.into_iter().map(IssueDto::from).collect())
    }
}

impl<T> ListIssuesService for T where T: DependOnDatabaseConnection + DependOnIssueQuery {}
