use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use catalog_infra::ServiceError;

use crate::app::dto::ErrorResponse;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        ServiceError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "Product not found"),
        ServiceError::Cancelled => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "cancelled",
            "request was cancelled before the operation finished",
        ),
        ServiceError::TimedOut(after) => json_error(
            StatusCode::GATEWAY_TIMEOUT,
            "timeout",
            format!("operation did not finish within {}s", after.as_secs_f64()),
        ),
        ServiceError::WorkerLost => {
            tracing::error!("write worker exited without a result");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "product store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(ErrorResponse {
            error: code,
            message: message.into(),
        }),
    )
        .into_response()
}

pub fn invalid_id() -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_id", "Invalid product ID")
}

pub fn invalid_payload(rejection: JsonRejection) -> axum::response::Response {
    tracing::debug!(error = %rejection.body_text(), "rejected request body");
    json_error(StatusCode::BAD_REQUEST, "invalid_payload", "Invalid request payload")
}

/// Response for a handler that panicked.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(panic = %detail, "handler panicked");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
}
