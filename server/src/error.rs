use std::process::{ExitCode, Termination};

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use error_stack::Report;
use kernel::KernelError;
use serde_json::json;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl ErrorStatus {
    fn status(&self) -> (StatusCode, &'static str) {
        match self.0.current_context() {
            KernelError::Validation => (StatusCode::BAD_REQUEST, "validation"),
            KernelError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            KernelError::Conflict => (StatusCode::CONFLICT, "conflict"),
            KernelError::Unavailable => (StatusCode::CONFLICT, "unavailable"),
            KernelError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
            KernelError::Persistence => (StatusCode::INTERNAL_SERVER_ERROR, "persistence"),
            KernelError::Timeout => (StatusCode::REQUEST_TIMEOUT, "timeout"),
            KernelError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = self.status();
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::debug!("{:?}", self.0);
        }
        (status, Json(json!({ "error": code }))).into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use error_stack::Report;
    use kernel::KernelError;

    use crate::error::ErrorStatus;

    #[test]
    fn unavailable_is_a_conflict_with_its_own_code() {
        let status = ErrorStatus::from(Report::new(KernelError::Unavailable));
        assert_eq!(status.status(), (StatusCode::CONFLICT, "unavailable"));
        let status = ErrorStatus::from(Report::new(KernelError::Conflict));
        assert_eq!(status.status(), (StatusCode::CONFLICT, "conflict"));
    }

    #[test]
    fn every_context_has_a_stable_status() {
        for (context, expected) in [
            (KernelError::Validation, StatusCode::BAD_REQUEST),
            (KernelError::NotFound, StatusCode::NOT_FOUND),
            (KernelError::Forbidden, StatusCode::FORBIDDEN),
            (KernelError::Persistence, StatusCode::INTERNAL_SERVER_ERROR),
            (KernelError::Timeout, StatusCode::REQUEST_TIMEOUT),
            (KernelError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ] {
            let response = ErrorStatus::from(Report::new(context)).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
