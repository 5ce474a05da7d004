//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a product.
///
/// Assigned by the store on insert (a database sequence), strictly positive and
/// never reused, including after a soft delete.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Wrap a raw identifier, rejecting zero and negatives.
    pub fn new(raw: i64) -> Result<Self, DomainError> {
        if raw <= 0 {
            return Err(DomainError::invalid_id(format!(
                "ProductId: must be positive, got {raw}"
            )));
        }
        Ok(Self(raw))
    }

    /// Wrap a raw identifier coming back from storage.
    pub fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<ProductId> for i64 {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

impl FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|e| DomainError::invalid_id(format!("ProductId: {e}")))?;
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids() {
        let id: ProductId = "42".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_zero_negative_and_garbage() {
        for raw in ["0", "-3", "abc", "", "1.5"] {
            let err = raw.parse::<ProductId>().unwrap_err();
            assert!(matches!(err, DomainError::InvalidId(_)), "{raw}: {err:?}");
        }
    }

    #[test]
    fn serializes_as_bare_number() {
        let id = ProductId::from_raw(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
