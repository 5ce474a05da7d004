use tokio_util::sync::CancellationToken;

/// Per-request context, inserted by [`crate::middleware::request_context`].
///
/// The token is a child of the process shutdown token. It is cancelled when the
/// server shuts down or when the request future is dropped (client went away).
#[derive(Debug, Clone)]
pub struct RequestContext {
    cancel: CancellationToken,
}

impl RequestContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}
