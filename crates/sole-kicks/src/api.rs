use std::future::Future;

use sole_core::SneakerSource;

use crate::error::KicksError;
use crate::types::RawProduct;

/// Listing parameters shared by both marketplaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub query: Option<String>,
    pub brand: Option<String>,
    pub limit: u32,
    pub page: u32,
}

impl ProductQuery {
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            query: None,
            brand: None,
            limit,
            page: 1,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Aggregator filter expression for the brand, e.g. `brand = 'Nike'`.
    #[must_use]
    pub fn filter_expression(&self) -> Option<String> {
        self.brand
            .as_deref()
            .filter(|b| !b.is_empty())
            .map(|b| format!("brand = '{b}'"))
    }
}

/// Read access to the marketplace aggregator.
///
/// Implemented by [`crate::KicksClient`] for production and by in-memory
/// fakes in tests.
pub trait MarketplaceApi: Send + Sync {
    /// Lists products from one marketplace.
    fn fetch_products(
        &self,
        source: SneakerSource,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<Vec<RawProduct>, KicksError>> + Send;

    /// Looks up a single product by slug. `Ok(None)` means the aggregator
    /// answered successfully with no data.
    fn fetch_product(
        &self,
        source: SneakerSource,
        id: &str,
    ) -> impl Future<Output = Result<Option<RawProduct>, KicksError>> + Send;
}
