use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tokio_util::sync::CancellationToken;

use crate::app::errors;
use crate::context::RequestContext;

/// Attach a [`RequestContext`] whose token is derived from the shutdown token,
/// and run the rest of the stack on its own task.
///
/// The handler task outlives the connection. If the client goes away first, this
/// future is dropped, the guard cancels the token, and the handler still running
/// on its task observes the cancellation (a write waiting in the executor ends
/// as `Cancelled`).
pub async fn request_context(
    State(shutdown): State<CancellationToken>,
    mut req: Request,
    next: Next,
) -> Response {
    let cancel = shutdown.child_token();
    let guard = cancel.clone().drop_guard();

    req.extensions_mut().insert(RequestContext::new(cancel));
    let handler = tokio::spawn(next.run(req));

    let response = match handler.await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "request handler task failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
        }
    };

    guard.disarm();
    response
}
