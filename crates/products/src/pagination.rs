//! Offset pagination arithmetic for catalog listings.

use serde::Serialize;
use utoipa::ToSchema;

/// Page size used when the caller gives none (or a non-positive one).
pub const DEFAULT_LIMIT: u32 = 10;

/// Normalized page request: `page >= 1`, `limit >= 1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Clamp raw inputs: a missing or non-positive page becomes 1, a missing or
    /// non-positive limit becomes [`DEFAULT_LIMIT`].
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p > 0 => u32::try_from(p).unwrap_or(u32::MAX),
            _ => 1,
        };
        let limit = match limit {
            Some(l) if l > 0 => u32::try_from(l).unwrap_or(u32::MAX),
            _ => DEFAULT_LIMIT,
        };
        Self { page, limit }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of a listing plus the unpaginated total.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductPage<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let req = PageRequest::default();
        assert_eq!((req.page(), req.limit(), req.offset()), (1, 10, 0));
    }

    #[test]
    fn clamps_non_positive_inputs() {
        let req = PageRequest::new(Some(0), Some(-5));
        assert_eq!((req.page(), req.limit()), (1, DEFAULT_LIMIT));

        let req = PageRequest::new(Some(-1), Some(0));
        assert_eq!((req.page(), req.limit()), (1, DEFAULT_LIMIT));
    }

    #[test]
    fn third_page_of_ten_skips_twenty() {
        let req = PageRequest::new(Some(3), Some(10));
        assert_eq!(req.offset(), 20);
    }

    #[test]
    fn huge_inputs_saturate_instead_of_wrapping() {
        let req = PageRequest::new(Some(i64::MAX), Some(i64::MAX));
        assert_eq!(req.page(), u32::MAX);
        assert_eq!(req.offset(), u64::from(u32::MAX - 1) * u64::from(u32::MAX));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: normalized values are always >= 1 and offset = (page-1)*limit.
            #[test]
            fn normalized_request_is_consistent(
                page in proptest::option::of(any::<i64>()),
                limit in proptest::option::of(any::<i64>()),
            ) {
                let req = PageRequest::new(page, limit);
                prop_assert!(req.page() >= 1);
                prop_assert!(req.limit() >= 1);
                prop_assert_eq!(
                    req.offset(),
                    u64::from(req.page() - 1) * u64::from(req.limit())
                );
            }
        }
    }
}
