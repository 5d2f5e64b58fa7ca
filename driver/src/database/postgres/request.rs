use error_stack::Report;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::RequestQuery;
use kernel::interface::update::RequestModifier;
use kernel::prelude::entity::{
    Isbn, IssueRequest, LibraryId, RequestId, RequestState, RequestType, RequestedAt,
    SelectLimit, SelectOffset, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresRequestRepository;

#[async_trait::async_trait]
impl RequestQuery for PostgresRequestRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id_for_update(
        &self,
        con: &mut PostgresTransaction,
        id: &RequestId,
    ) -> error_stack::Result<Option<IssueRequest>, KernelError> {
        PgRequestInternal::find_by_id_for_update(con, id).await
    }

    async fn find_pending(
        &self,
        con: &mut PostgresTransaction,
        lib_id: &LibraryId,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<IssueRequest>, KernelError> {
        PgRequestInternal::find_pending(con, lib_id, limit, offset).await
    }
}

#[async_trait::async_trait]
impl RequestModifier for PostgresRequestRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        request: &IssueRequest,
    ) -> error_stack::Result<(), KernelError> {
        PgRequestInternal::create(con, request).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        request: &IssueRequest,
    ) -> error_stack::Result<(), KernelError> {
        PgRequestInternal::update(con, request).await
    }
}

#[derive(sqlx::FromRow)]
struct RequestRow {
    id: Uuid,
    book_id: String,
    lib_id: i64,
    reader_id: i64,
    request_type: String,
    request_date: OffsetDateTime,
    approval_date: Option<OffsetDateTime>,
    status: String,
}

impl TryFrom<RequestRow> for IssueRequest {
    type Error = Report<KernelError>;
    fn try_from(value: RequestRow) -> Result<Self, Self::Error> {
        let request_type = value.request_type.parse::<RequestType>()?;
        let state =
            RequestState::from_row(&value.status, value.approval_date).ok_or_else(|| {
                Report::new(KernelError::Persistence).attach_printable(format!(
                    "request {} has status {} with approval date {:?}",
                    value.id, value.status, value.approval_date
                ))
            })?;
        Ok(IssueRequest::new(
            RequestId::new(value.id),
            Isbn::new(value.book_id),
            LibraryId::new(value.lib_id),
            UserId::new(value.reader_id),
            request_type,
            RequestedAt::new(value.request_date),
            state,
        ))
    }
}

pub(in crate::database) struct PgRequestInternal;

impl PgRequestInternal {
    async fn find_by_id_for_update(
        con: &mut PgConnection,
        id: &RequestId,
    ) -> error_stack::Result<Option<IssueRequest>, KernelError> {
        let row = sqlx::query_as::<_, RequestRow>(
            // language=postgresql
            r#"
            SELECT id, book_id, lib_id, reader_id, request_type, request_date, approval_date, status
            FROM request_events
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(IssueRequest::try_from).transpose()
    }

    async fn find_pending(
        con: &mut PgConnection,
        lib_id: &LibraryId,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<IssueRequest>, KernelError> {
        let rows = sqlx::query_as::<_, RequestRow>(
            // language=postgresql
            r#"
            SELECT id, book_id, lib_id, reader_id, request_type, request_date, approval_date, status
            FROM request_events
            WHERE lib_id = $1 AND status = 'Pending'
            ORDER BY request_date ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(lib_id.as_ref())
        .bind(i64::from(*limit.as_ref()))
        .bind(i64::from(*offset.as_ref()))
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(IssueRequest::try_from).collect()
    }

    async fn create(
        con: &mut PgConnection,
        request: &IssueRequest,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO request_events (id, book_id, lib_id, reader_id, request_type, request_date, approval_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(request.id().as_ref())
        .bind(request.isbn().as_ref())
        .bind(request.lib_id().as_ref())
        .bind(request.reader_id().as_ref())
        .bind(request.request_type().to_string())
        .bind(request.requested_at().as_ref())
        .bind(request.state().decided_at())
        .bind(request.state().name())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(
        con: &mut PgConnection,
        request: &IssueRequest,
    ) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE request_events
            SET approval_date = $2, status = $3
            WHERE id = $1
            "#,
        )
        .bind(request.id().as_ref())
        .bind(request.state().decided_at())
        .bind(request.state().name())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("request {} does not exist", request.id().as_ref())));
        }
        Ok(())
    }
}
