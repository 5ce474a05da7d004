use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use catalog_core::{DomainError, DomainResult, Entity, ProductId};

/// Entity: Product (one row of the `products` table).
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker. A product with this set is invisible to every read.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Overwrite the mutable fields with an already validated draft.
    ///
    /// Identity and timestamps are left alone; the store advances `updated_at`
    /// when it persists the change.
    pub fn apply(&mut self, draft: &ProductDraft) {
        self.name = draft.name.clone();
        self.description = draft.description.clone();
        self.price = draft.price;
        self.stock = draft.stock;
    }

    /// Externally visible projection (drops the soft-delete marker).
    pub fn to_response(&self) -> ProductResponse {
        ProductResponse {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            stock: self.stock,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Mutation payload as received on the wire (create and update share it).
///
/// Every field is lenient at the serde level so that missing or empty values
/// surface as a validation failure rather than a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock: i32,
}

impl ProductRequest {
    /// Check the payload and turn it into a draft the store can persist.
    pub fn validate(&self) -> DomainResult<ProductDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }

        let price = self
            .price
            .ok_or_else(|| DomainError::validation("price is required"))?;
        if !price.is_finite() {
            return Err(DomainError::validation("price must be a finite number"));
        }
        if price < 0.0 {
            return Err(DomainError::validation("price must be greater than or equal to 0"));
        }

        if self.stock < 0 {
            return Err(DomainError::validation("stock must be greater than or equal to 0"));
        }

        Ok(ProductDraft {
            name: name.to_string(),
            description: self.description.clone(),
            price,
            stock: self.stock,
        })
    }
}

/// A validated product payload with no identity yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
}

/// Projection of a product returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    #[schema(value_type = i64)]
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, price: Option<f64>, stock: i32) -> ProductRequest {
        ProductRequest {
            name: name.to_string(),
            description: "desc".to_string(),
            price,
            stock,
        }
    }

    fn sample_product() -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::from_raw(1),
            name: "Old".to_string(),
            description: "old".to_string(),
            price: 1.0,
            stock: 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn validate_accepts_widget() {
        let draft = request("Widget", Some(9.99), 5).validate().unwrap();
        assert_eq!(draft.name, "Widget");
        assert_eq!(draft.price, 9.99);
        assert_eq!(draft.stock, 5);
    }

    #[test]
    fn validate_accepts_zero_price_and_stock() {
        let draft = request("Freebie", Some(0.0), 0).validate().unwrap();
        assert_eq!(draft.price, 0.0);
        assert_eq!(draft.stock, 0);
    }

    #[test]
    fn validate_rejects_blank_name() {
        let err = request("   ", Some(1.0), 0).validate().unwrap_err();
        assert_eq!(err, DomainError::validation("name is required"));
    }

    #[test]
    fn validate_rejects_missing_price() {
        let err = request("Widget", None, 0).validate().unwrap_err();
        assert_eq!(err, DomainError::validation("price is required"));
    }

    #[test]
    fn validate_rejects_negative_values() {
        assert!(matches!(
            request("Widget", Some(-0.01), 0).validate(),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            request("Widget", Some(1.0), -1).validate(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_non_finite_price() {
        assert!(request("Widget", Some(f64::NAN), 0).validate().is_err());
        assert!(request("Widget", Some(f64::INFINITY), 0).validate().is_err());
    }

    #[test]
    fn request_defaults_missing_optional_fields() {
        let req: ProductRequest =
            serde_json::from_str(r#"{"name":"Widget","price":9.99}"#).unwrap();
        assert_eq!(req.description, "");
        assert_eq!(req.stock, 0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn apply_keeps_identity_and_timestamps() {
        let mut product = sample_product();
        let before = product.clone();
        let draft = request("New", Some(2.5), 9).validate().unwrap();

        product.apply(&draft);

        assert_eq!(product.id, before.id);
        assert_eq!(product.created_at, before.created_at);
        assert_eq!(product.updated_at, before.updated_at);
        assert_eq!(product.name, "New");
        assert_eq!(product.price, 2.5);
        assert_eq!(product.stock, 9);
    }

    #[test]
    fn response_omits_soft_delete_marker() {
        let mut product = sample_product();
        product.deleted_at = Some(Utc::now());
        assert!(product.is_deleted());

        let json = serde_json::to_value(product.to_response()).unwrap();
        assert!(json.get("deleted_at").is_none());
        assert_eq!(json["id"], 1);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: any non-blank name with non-negative price/stock validates,
            /// and the draft carries the same values (name trimmed).
            #[test]
            fn valid_requests_round_trip_into_drafts(
                name in "[A-Za-z][A-Za-z0-9 ]{0,60}",
                price in 0.0f64..1_000_000.0,
                stock in 0i32..100_000,
            ) {
                let req = request(&name, Some(price), stock);
                let draft = req.validate().unwrap();
                prop_assert_eq!(draft.name, name.trim().to_string());
                prop_assert_eq!(draft.price, price);
                prop_assert_eq!(draft.stock, stock);
            }

            /// Property: negative stock never validates.
            #[test]
            fn negative_stock_is_rejected(stock in i32::MIN..0) {
                prop_assert!(request("Widget", Some(1.0), stock).validate().is_err());
            }
        }
    }
}
