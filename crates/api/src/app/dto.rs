use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `GET /products` query string.
///
/// Values are kept as text so a non-numeric `page` or `limit` is treated as
/// missing instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> Option<i64> {
        lenient(self.page.as_deref())
    }

    pub fn limit(&self) -> Option<i64> {
        lenient(self.limit.as_deref())
    }
}

fn lenient(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Product deleted successfully")]
    pub message: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable code, e.g. `invalid_id` or `timeout`.
    #[schema(example = "not_found")]
    pub error: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> ListQuery {
        ListQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn numeric_values_are_parsed() {
        let q = query(Some("3"), Some(" 25 "));
        assert_eq!(q.page(), Some(3));
        assert_eq!(q.limit(), Some(25));
    }

    #[test]
    fn garbage_is_treated_as_absent() {
        let q = query(Some("abc"), Some("1.5"));
        assert_eq!(q.page(), None);
        assert_eq!(q.limit(), None);
    }

    #[test]
    fn negatives_pass_through_for_clamping_later() {
        assert_eq!(query(Some("-4"), None).page(), Some(-4));
    }
}
