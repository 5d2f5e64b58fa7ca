use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    Caller, DecideRequestRequest, ListRequestsRequest, RaiseRequestRequest, RequestTransformer,
};
use crate::response::{IssuePresenter, RequestPresenter};
use application::service::{
    ApproveRequestService, ListRequestsService, RaiseRequestService, RejectRequestService,
};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

pub trait RequestRouter {
    fn route_request(self) -> Self;
}

impl RequestRouter for Router<AppModule> {
    fn route_request(self) -> Self {
        self.route(
            "/requests",
            get(
                |State(module): State<AppModule>,
                 Caller(actor): Caller,
                 Query(req): Query<ListRequestsRequest>| async move {
                    Controller::new(RequestTransformer, RequestPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.list_requests(&actor, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 Caller(actor): Caller,
                 Json(req): Json<RaiseRequestRequest>| async move {
                    Controller::new(RequestTransformer, RequestPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.raise_request(&actor, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                        .map(|res| (StatusCode::CREATED, res))
                },
            ),
        )
        .route(
            "/requests/:id/approve",
            post(
                |State(module): State<AppModule>,
                 Caller(actor): Caller,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(RequestTransformer, IssuePresenter)
                        .intake(DecideRequestRequest::new(id))
                        .handle(|dto| async move { module.approve_request(&actor, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/requests/:id/reject",
            post(
                |State(module): State<AppModule>,
                 Caller(actor): Caller,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(RequestTransformer, RequestPresenter)
                        .intake(DecideRequestRequest::new(id))
                        .handle(|dto| async move { module.reject_request(&actor, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
