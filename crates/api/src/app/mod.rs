//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: which store and executor back the catalog
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: query-string and response DTOs
//! - `errors.rs`: consistent error responses
//! - `docs.rs`: OpenAPI document (served with Swagger UI)

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware;

pub mod docs;
pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: AppServices) -> Router {
    let shutdown = services.shutdown.clone();

    let api = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            shutdown,
            middleware::request_context,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/v1", api)
        .merge(SwaggerUi::new("/swagger").url(docs::OPENAPI_JSON, docs::ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(errors::panic_response))
                .layer(CorsLayer::permissive()),
        )
}
