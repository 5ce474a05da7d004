use utoipa::OpenApi;

use crate::app::dto::{ErrorResponse, HealthResponse, MessageResponse};
use crate::app::routes::{products, system};

/// Served as JSON at [`OPENAPI_JSON`] and browsable under `/swagger`.
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Catalog API",
        version = "1.0",
        description = "CRUD over products. Writes are bounded by a server-side deadline."
    ),
    paths(
        products::create_product,
        products::get_product,
        products::list_products,
        products::update_product,
        products::delete_product,
        system::health,
    ),
    components(schemas(ErrorResponse, HealthResponse, MessageResponse)),
    tags(
        (name = "products", description = "Product catalog"),
        (name = "system", description = "Liveness")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_product_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/v1/products"));
        assert!(paths.contains_key("/api/v1/products/{id}"));
        assert!(paths.contains_key("/health"));
        assert_eq!(doc.info.title, "Product Catalog API");
    }

    #[test]
    fn product_schemas_are_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.expect("components").schemas;

        for name in ["ProductRequest", "ProductResponse", "ErrorResponse"] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }
    }
}
