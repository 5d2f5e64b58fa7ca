use error_stack::Report;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::IssueQuery;
use kernel::interface::update::IssueModifier;
use kernel::prelude::entity::{
    ExpectedReturnAt, Isbn, Issue, IssueId, IssueStatus, IssuedAt, LibraryId, ReturnedAt, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresIssueRepository;

#[async_trait::async_trait]
impl IssueQuery for PostgresIssueRepository {
    type Transaction = PostgresTransaction;

    async fn find_outstanding(
        &self,
        con: &mut PostgresTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
        reader_id: &UserId,
    ) -> error_stack::Result<Option<Issue>, KernelError> {
        PgIssueInternal::find_outstanding(con, lib_id, isbn, reader_id, false).await
    }

    async fn find_outstanding_for_update(
        &self,
        con: &mut PostgresTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
        reader_id: &UserId,
    ) -> error_stack::Result<Option<Issue>, KernelError> {
        PgIssueInternal::find_outstanding(con, lib_id, isbn, reader_id, true).await
    }

    async fn find_by_reader(
        &self,
        con: &mut PostgresTransaction,
        lib_id: &LibraryId,
        reader_id: &UserId,
    ) -> error_stack::Result<Vec<Issue>, KernelError> {
        PgIssueInternal::find_by_reader(con, lib_id, reader_id).await
    }

    async fn find_earliest_return(
        &self,
        con: &mut PostgresTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<ExpectedReturnAt>, KernelError> {
        PgIssueInternal::find_earliest_return(con, lib_id, isbn).await
    }
}

#[async_trait::async_trait]
impl IssueModifier for PostgresIssueRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        issue: &Issue,
    ) -> error_stack::Result<(), KernelError> {
        PgIssueInternal::create(con, issue).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        issue: &Issue,
    ) -> error_stack::Result<(), KernelError> {
        PgIssueInternal::update(con, issue).await
    }
}

#[derive(sqlx::FromRow)]
struct IssueRow {
    id: Uuid,
    isbn: String,
    lib_id: i64,
    reader_id: i64,
    issue_date: OffsetDateTime,
    expected_return_date: OffsetDateTime,
    actual_return_date: Option<OffsetDateTime>,
    issue_status: String,
}

impl TryFrom<IssueRow> for Issue {
    type Error = Report<KernelError>;
    fn try_from(value: IssueRow) -> Result<Self, Self::Error> {
        let status = value.issue_status.parse::<IssueStatus>()?;
        Ok(Issue::new(
            IssueId::new(value.id),
            Isbn::new(value.isbn),
            LibraryId::new(value.lib_id),
            UserId::new(value.reader_id),
            IssuedAt::new(value.issue_date),
            ExpectedReturnAt::new(value.expected_return_date),
            value.actual_return_date.map(ReturnedAt::new),
            status,
        ))
    }
}

pub(in crate::database) struct PgIssueInternal;

impl PgIssueInternal {
    async fn find_outstanding(
        con: &mut PgConnection,
        lib_id: &LibraryId,
        isbn: &Isbn,
        reader_id: &UserId,
        lock: bool,
    ) -> error_stack::Result<Option<Issue>, KernelError> {
        let query = if lock {
            // language=postgresql
            r#"
            SELECT id, isbn, lib_id, reader_id, issue_date, expected_return_date, actual_return_date, issue_status
            FROM issue_registry
            WHERE lib_id = $1 AND isbn = $2 AND reader_id = $3 AND issue_status = 'Issued'
            FOR UPDATE
            "#
        } else {
            // language=postgresql
            r#"
            SELECT id, isbn, lib_id, reader_id, issue_date, expected_return_date, actual_return_date, issue_status
            FROM issue_registry
            WHERE lib_id = $1 AND isbn = $2 AND reader_id = $3 AND issue_status = 'Issued'
            "#
        };
        let row = sqlx::query_as::<_, IssueRow>(query)
            .bind(lib_id.as_ref())
            .bind(isbn.as_ref())
            .bind(reader_id.as_ref())
            .fetch_optional(con)
            .await
            .convert_error()?;
        row.map(Issue::try_from).transpose()
    }

    async fn find_by_reader(
        con: &mut PgConnection,
        lib_id: &LibraryId,
        reader_id: &UserId,
    ) -> error_stack::Result<Vec<Issue>, KernelError> {
        let rows = sqlx::query_as::<_, IssueRow>(
            // language=postgresql
            r#"
            SELECT id, isbn, lib_id, reader_id, issue_date, expected_return_date, actual_return_date, issue_status
            FROM issue_registry
            WHERE lib_id = $1 AND reader_id = $2
            ORDER BY issue_date DESC
            "#,
        )
        .bind(lib_id.as_ref())
        .bind(reader_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Issue::try_from).collect()
    }

    async fn find_earliest_return(
        con: &mut PgConnection,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<ExpectedReturnAt>, KernelError> {
        let earliest = sqlx::query_scalar::<_, Option<OffsetDateTime>>(
            // language=postgresql
            r#"
            SELECT MIN(expected_return_date)
            FROM issue_registry
            WHERE lib_id = $1 AND isbn = $2 AND issue_status = 'Issued'
            "#,
        )
        .bind(lib_id.as_ref())
        .bind(isbn.as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(earliest.map(ExpectedReturnAt::new))
    }

    async fn create(con: &mut PgConnection, issue: &Issue) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO issue_registry (id, isbn, lib_id, reader_id, issue_date, expected_return_date, actual_return_date, issue_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(issue.id().as_ref())
        .bind(issue.isbn().as_ref())
        .bind(issue.lib_id().as_ref())
        .bind(issue.reader_id().as_ref())
        .bind(issue.issued_at().as_ref())
        .bind(issue.expected_return_at().as_ref())
        .bind(issue.returned_at().map(OffsetDateTime::from))
        .bind(issue.status().to_string())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, issue: &Issue) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE issue_registry
            SET actual_return_date = $2, issue_status = $3
            WHERE id = $1
            "#,
        )
        .bind(issue.id().as_ref())
        .bind(issue.returned_at().map(OffsetDateTime::from))
        .bind(issue.status().to_string())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("issue {} does not exist", issue.id().as_ref())));
        }
        Ok(())
    }
}
