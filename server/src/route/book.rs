use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    AddCopiesRequest, BookTransformer, Caller, GetBookRequest, RemoveCopiesRequest,
    UpdateBookRequest,
};
use crate::response::BookPresenter;
use application::service::{
    AddCopiesService, GetBookService, RemoveCopiesService, UpdateBookService,
};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use error_stack::Report;
use kernel::KernelError;

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl BookRouter for Router<AppModule> {
    fn route_book(self) -> Self {
        self.route(
            "/books",
            post(
                |State(module): State<AppModule>,
                 Caller(actor): Caller,
                 Json(req): Json<AddCopiesRequest>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.add_copies(&actor, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:isbn",
            get(
                |State(module): State<AppModule>,
                 Caller(actor): Caller,
                 Path(isbn): Path<String>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookRequest::new(isbn))
                        .handle(|dto| async move { module.get_book(&actor, dto).await })
                        .await
                        .and_then(|res| {
                            res.ok_or_else(|| {
                                Report::new(KernelError::NotFound)
                                    .attach_printable("book is not in the catalog")
                            })
                        })
                        .map_err(ErrorStatus::from)
                },
            )
            .patch(
                |State(module): State<AppModule>,
                 Caller(actor): Caller,
                 Path(isbn): Path<String>,
                 Json(req): Json<UpdateBookRequest>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake((isbn, req))
                        .handle(|dto| async move { module.update_book(&actor, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>,
                 Caller(actor): Caller,
                 Path(isbn): Path<String>,
                 Json(req): Json<RemoveCopiesRequest>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake((isbn, req))
                        .handle(|dto| async move { module.remove_copies(&actor, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                        .map(|res| {
                            res.map(IntoResponse::into_response)
                                .unwrap_or_else(|| StatusCode::NO_CONTENT.into_response())
                        })
                },
            ),
        )
    }
}
