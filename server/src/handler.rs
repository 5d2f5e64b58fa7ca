use std::ops::Deref;
use std::sync::Arc;

use driver::database::{
    PostgresBookRepository, PostgresDatabase, PostgresIssueRepository, PostgresRequestRepository,
};
use kernel::interface::config::DependOnLoanPolicy;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::query::{DependOnBookQuery, DependOnIssueQuery, DependOnRequestQuery};
use kernel::interface::update::{
    DependOnBookModifier, DependOnIssueModifier, DependOnRequestModifier,
};
use kernel::prelude::entity::LoanPolicy;
use kernel::KernelError;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init().await?)))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

pub struct Handler {
    pgpool: PostgresDatabase,
    loan_policy: LoanPolicy,
}

impl Handler {
    pub async fn init() -> error_stack::Result<Self, KernelError> {
        let loan_policy = driver::config::loan_policy()?;
        let pgpool = PostgresDatabase::new().await?;
        pgpool.migrate().await?;
        tracing::info!(
            "loan period is {} days",
            loan_policy.loan_period().whole_days()
        );

        Ok(Self {
            pgpool,
            loan_policy,
        })
    }
}

impl DependOnDatabaseConnection for Handler {
    type DatabaseConnection = PostgresDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.pgpool
    }
}

impl DependOnLoanPolicy for Handler {
    fn loan_policy(&self) -> &LoanPolicy {
        &self.loan_policy
    }
}

impl DependOnBookQuery for Handler {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for Handler {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

impl DependOnIssueQuery for Handler {
    type IssueQuery = PostgresIssueRepository;
    fn issue_query(&self) -> &Self::IssueQuery {
        &PostgresIssueRepository
    }
}

impl DependOnIssueModifier for Handler {
    type IssueModifier = PostgresIssueRepository;
    fn issue_modifier(&self) -> &Self::IssueModifier {
        &PostgresIssueRepository
    }
}

impl DependOnRequestQuery for Handler {
    type RequestQuery = PostgresRequestRepository;
    fn request_query(&self) -> &Self::RequestQuery {
        &PostgresRequestRepository
    }
}

impl DependOnRequestModifier for Handler {
    type RequestModifier = PostgresRequestRepository;
    fn request_modifier(&self) -> &Self::RequestModifier {
        &PostgresRequestRepository
    }
}
