use error_stack::Report;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::config::DependOnLoanPolicy;
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::gate::Capability;
use kernel::interface::query::{
    BookQuery, DependOnBookQuery, DependOnIssueQuery, DependOnRequestQuery, IssueQuery,
    RequestQuery,
};
use kernel::interface::update::{
    BookModifier, DependOnBookModifier, DependOnIssueModifier, DependOnRequestModifier,
    IssueModifier, RequestModifier,
};
use kernel::prelude::entity::{
    Actor, Isbn, Issue, IssueId, IssueRequest, RequestId, SelectLimit, SelectOffset,
};
use kernel::KernelError;

use crate::service::book::not_found;
use crate::transfer::{DecideRequestDto, IssueDto, ListRequestsDto, RaiseRequestDto, RequestDto};

#[async_trait::async_trait]
pub trait RaiseRequestService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookQuery
    + DependOnIssueQuery
    + DependOnRequestModifier
{
    async fn raise_request(
        &self,
        actor: &Actor,
        dto: RaiseRequestDto,
    ) -> error_stack::Result<RequestDto, KernelError> {
        let lib_id = actor.lib_id();
        Capability::RAISE_REQUEST.check(actor, lib_id)?;
        let mut connection = self.database_connection().transact().await?;

        let isbn = Isbn::new(dto.isbn);
        let book = self
            .book_query()
            .find_by_isbn(&mut connection, lib_id, &isbn)
            .await?
            .ok_or_else(|| not_found(&isbn))?;
        if book.available_copies().is_exhausted() {
            return Err(Report::new(KernelError::Unavailable)
                .attach_printable(format!("no copy of {} left", isbn.as_ref())));
        }
        let holding = self
            .issue_query()
            .find_outstanding(&mut connection, lib_id, &isbn, actor.id())
            .await?;
        if holding.is_some() {
            return Err(Report::new(KernelError::Conflict).attach_printable(format!(
                "reader {} already holds {}",
                actor.id().as_ref(),
                isbn.as_ref()
            )));
        }

        let request = IssueRequest::raise(
            RequestId::new(Uuid::new_v4()),
            isbn,
            *lib_id,
            *actor.id(),
            OffsetDateTime::now_utc(),
        );
        self.request_modifier()
            .create(&mut connection, &request)
            .await?;
        connection.commit().await?;

        tracing::info!(
            "reader {} requested {}",
            actor.id().as_ref(),
            request.isbn().as_ref()
        );
        Ok(RequestDto::from(request))
    }
}

impl<T> RaiseRequestService for T where
    T: DependOnDatabaseConnection
        + DependOnBookQuery
        + DependOnIssueQuery
        + DependOnRequestModifier
{
}

/// Approval reserves a copy and opens the loan in the same transaction as the
/// state change, so a failure at any step leaves no trace.
#[async_trait::async_trait]
pub trait ApproveRequestService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnLoanPolicy
    + DependOnBookQuery
    + DependOnBookModifier
    + DependOnIssueQuery
    + DependOnIssueModifier
    + DependOnRequestQuery
    + DependOnRequestModifier
{
    async fn approve_request(
        &self,
        actor: &Actor,
        dto: DecideRequestDto,
    ) -> error_stack::Result<IssueDto, KernelError> {
        Capability::DECIDE_REQUEST.check(actor, actor.lib_id())?;
        let mut connection = self.database_connection().transact().await?;

        let id = RequestId::new(dto.id);
        let request = self
            .request_query()
            .find_by_id_for_update(&mut connection, &id)
            .await?
            .ok_or_else(|| request_not_found(&id))?;
        Capability::DECIDE_REQUEST.check(actor, request.lib_id())?;

        let now = OffsetDateTime::now_utc();
        let request = request.approve(now).inspect_err(|report| {
            tracing::warn!("refused to approve request {}: {report:?}", id.as_ref());
        })?;
        let (lib_id, isbn, reader_id) = (request.lib_id(), request.isbn(), request.reader_id());

        let holding = self
            .issue_query()
            .find_outstanding_for_update(&mut connection, lib_id, isbn, reader_id)
            .await?;
        if holding.is_some() {
            tracing::warn!(
                "reader {} already holds {}, request {} stays pending",
                reader_id.as_ref(),
                isbn.as_ref(),
                id.as_ref()
            );
            return Err(Report::new(KernelError::Conflict).attach_printable(format!(
                "reader {} already holds {}",
                reader_id.as_ref(),
                isbn.as_ref()
            )));
        }

        let reserved = self
            .book_modifier()
            .reserve_copy(&mut connection, lib_id, isbn)
            .await?;
        if reserved.is_none() {
            let exists = self
                .book_query()
                .find_by_isbn(&mut connection, lib_id, isbn)
                .await?
                .is_some();
            if !exists {
                return Err(not_found(isbn));
            }
            tracing::warn!("no copy of {} left for request {}", isbn.as_ref(), id.as_ref());
            return Err(Report::new(KernelError::Unavailable)
                .attach_printable(format!("no copy of {} left", isbn.as_ref())));
        }

        let issue = Issue::lend(
            IssueId::new(Uuid::new_v4()),
            isbn.clone(),
            *lib_id,
            *reader_id,
            now,
            self.loan_policy(),
        )?;
        self.issue_modifier().create(&mut connection, &issue).await?;
        self.request_modifier()
            .update(&mut connection, &request)
            .await?;
        connection.commit().await?;

        tracing::info!(
            "approved request {}, {} is due {}",
            id.as_ref(),
            isbn.as_ref(),
            issue.expected_return_at().as_ref()
        );
        Ok(IssueDto::from(issue))
    }
}

impl<T> ApproveRequestService for T where
    T: DependOnDatabaseConnection
        + DependOnLoanPolicy
        + DependOnBookQuery
        + DependOnBookModifier
        + DependOnIssueQuery
        + DependOnIssueModifier
        + DependOnRequestQuery
        + DependOnRequestModifier
{
}

#[async_trait::async_trait]
pub trait RejectRequestService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnRequestQuery + DependOnRequestModifier
{
    async fn reject_request(
        &self,
        actor: &Actor,
        dto: DecideRequestDto,
    ) -> error_stack::Result<RequestDto, KernelError> {
        Capability::DECIDE_REQUEST.check(actor, actor.lib_id())?;
        let mut connection = self.database_connection().transact().await?;

        let id = RequestId::new(dto.id);
        let request = self
            .request_query()
            .find_by_id_for_update(&mut connection, &id)
            .await?
            .ok_or_else(|| request_not_found(&id))?;
        Capability::DECIDE_REQUEST.check(actor, request.lib_id())?;

        let request = request
            .reject(OffsetDateTime::now_utc())
            .inspect_err(|report| {
                tracing::warn!("refused to reject request {}: {report:?}", id.as_ref());
            })?;
        self.request_modifier()
            .update(&mut connection, &request)
            .await?;
        connection.commit().await?;

        tracing::info!("rejected request {}", id.as_ref());
        Ok(RequestDto::from(request))
    }
}

impl<T> RejectRequestService for T where
    T: DependOnDatabaseConnection + DependOnRequestQuery + DependOnRequestModifier
{
}

#[async_trait::async_trait]
pub trait ListRequestsService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnRequestQuery
{
    async fn list_requests(
        &self,
        actor: &Actor,
        dto: ListRequestsDto,
    ) -> error_stack::Result<Vec<RequestDto>, KernelError> {
        let lib_id = actor.lib_id();
        Capability::DECIDE_REQUEST.check(actor, lib_id)?;
        let mut connection = self.database_connection().transact().await?;

        let limit = dto.limit.map(SelectLimit::new).unwrap_or_default();
        let offset = dto.offset.map(SelectOffset::new).unwrap_or_default();
        let pending = self
            .request_query()
            .find_pending(&mut connection, lib_id, &limit, &offset)
            .await?;
        Ok(pending.into_iter().map(RequestDto::from).collect())
    }
}

impl<T> ListRequestsService for T where T: DependOnDatabaseConnection + DependOnRequestQuery {}

fn request_not_found(id: &RequestId) -> Report<KernelError> {
    Report::new(KernelError::NotFound).attach_printable(format!("no request {}", id.as_ref()))
}
