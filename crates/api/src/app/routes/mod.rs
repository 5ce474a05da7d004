use axum::Router;

pub mod products;
pub mod system;

/// Router for the versioned API (mounted under `/api/v1`).
pub fn router() -> Router {
    Router::new().nest("/products", products::router())
}
