use axum::{
    Json, Router,
    extract::{Extension, Path, Query, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use catalog_products::{ProductId, ProductPage, ProductRequest, ProductResponse};

use crate::app::dto::{ErrorResponse, ListQuery, MessageResponse};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::RequestContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn parse_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    raw.parse::<ProductId>().map_err(|_| errors::invalid_id())
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 503, description = "Request cancelled", body = ErrorResponse),
        (status = 504, description = "Write timed out", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn create_product(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::invalid_payload(rejection),
    };

    match services.products.create(ctx.cancel_token(), req).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, description = "Invalid product ID", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn get_product(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.products.get(id).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// List products, one page at a time
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    params(
        ("page" = Option<i64>, Query, description = "Page number (default 1)"),
        ("limit" = Option<i64>, Query, description = "Page size (default 10)")
    ),
    responses(
        (status = 200, description = "One page of products", body = ProductPage<ProductResponse>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_products(
    Extension(services): Extension<AppServices>,
    Query(query): Query<ListQuery>,
) -> axum::response::Response {
    match services.products.list(query.page(), query.limit()).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid ID or payload", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 503, description = "Request cancelled", body = ErrorResponse),
        (status = 504, description = "Write timed out", body = ErrorResponse)
    )
)]
pub async fn update_product(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::invalid_payload(rejection),
    };

    match services.products.update(ctx.cancel_token(), id, req).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 400, description = "Invalid product ID", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn delete_product(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.products.delete(id).await {
        Ok(()) => Json(MessageResponse {
            message: "Product deleted successfully",
        })
        .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
