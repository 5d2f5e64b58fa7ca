use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{Caller, IssueTransformer, ListIssuesRequest, ReturnBookRequest};
use crate::response::IssuePresenter;
use application::service::{ListIssuesService, ReturnBookService};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

pub trait IssueRouter {
    fn route_issue(self) -> Self;
}

impl IssueRouter for Router<AppModule> {
    fn route_issue(self) -> Self {
        self.route(
            "/issues",
            get(
                |State(module): State<AppModule>,
                 Caller(actor): Caller,
                 Query(req): Query<ListIssuesRequest>| async move {
                    Controller::new(IssueTransformer, IssuePresenter)
                        .intake(req)
                        .handle(|dto| async move { module.list_issues(&actor, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/issues/return",
            post(
                |State(module): State<AppModule>,
                 Caller(actor): Caller,
                 Json(req): Json<ReturnBookRequest>| async move {
                    Controller::new(IssueTransformer, IssuePresenter)
                        .intake(req)
                        .handle(|dto| async move { module.return_book(&actor, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
