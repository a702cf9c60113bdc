//! In-memory [`MarketplaceApi`] for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::json;
use sole_core::SneakerSource;

use crate::api::{MarketplaceApi, ProductQuery};
use crate::error::KicksError;
use crate::types::{GoatProduct, RawProduct, StockXProduct};

#[derive(Debug, Clone)]
enum Reply<T> {
    Ok(T),
    Status(u16),
}

impl<T: Clone> Reply<T> {
    fn resolve(&self, source: SneakerSource) -> Result<T, KicksError> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Status(status) => Err(KicksError::Upstream {
                status: *status,
                url: format!("fake://{source}"),
                body: json!({ "error": format!("status {status}") }),
            }),
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeApi {
    listings: HashMap<SneakerSource, Reply<Vec<RawProduct>>>,
    details: HashMap<(SneakerSource, String), Reply<Option<RawProduct>>>,
    pub(crate) listing_calls: Mutex<Vec<(SneakerSource, ProductQuery)>>,
    pub(crate) detail_calls: Mutex<Vec<(SneakerSource, String)>>,
}

impl FakeApi {
    pub(crate) fn with_listing(mut self, source: SneakerSource, products: Vec<RawProduct>) -> Self {
        self.listings.insert(source, Reply::Ok(products));
        self
    }

    pub(crate) fn with_listing_status(mut self, source: SneakerSource, status: u16) -> Self {
        self.listings.insert(source, Reply::Status(status));
        self
    }

    pub(crate) fn with_detail(
        mut self,
        source: SneakerSource,
        id: &str,
        product: Option<RawProduct>,
    ) -> Self {
        self.details
            .insert((source, id.to_owned()), Reply::Ok(product));
        self
    }

    pub(crate) fn with_detail_status(mut self, source: SneakerSource, id: &str, status: u16) -> Self {
        self.details
            .insert((source, id.to_owned()), Reply::Status(status));
        self
    }

    pub(crate) fn listing_calls(&self) -> Vec<(SneakerSource, ProductQuery)> {
        self.listing_calls.lock().expect("lock").clone()
    }

    pub(crate) fn detail_calls(&self) -> Vec<(SneakerSource, String)> {
        self.detail_calls.lock().expect("lock").clone()
    }
}

impl MarketplaceApi for FakeApi {
    async fn fetch_products(
        &self,
        source: SneakerSource,
        query: &ProductQuery,
    ) -> Result<Vec<RawProduct>, KicksError> {
        self.listing_calls
            .lock()
            .expect("lock")
            .push((source, query.clone()));
        self.listings
            .get(&source)
            .map_or(Ok(Vec::new()), |reply| reply.resolve(source))
    }

    async fn fetch_product(
        &self,
        source: SneakerSource,
        id: &str,
    ) -> Result<Option<RawProduct>, KicksError> {
        self.detail_calls
            .lock()
            .expect("lock")
            .push((source, id.to_owned()));
        self.details
            .get(&(source, id.to_owned()))
            .map_or(Ok(None), |reply| reply.resolve(source))
    }
}

/// A displayable StockX sneaker with the given slug and aggregate prices.
pub(crate) fn stockx_sneaker(slug: &str, title: &str, min: Option<i64>) -> RawProduct {
    RawProduct::StockX(StockXProduct {
        id: Some(format!("id-{slug}")),
        slug: Some(slug.to_owned()),
        title: Some(title.to_owned()),
        image: Some(format!("https://images.example.com/{slug}.png")),
        min_price: min,
        ..StockXProduct::default()
    })
}

/// A displayable GOAT sneaker with the given slug and no variants.
pub(crate) fn goat_sneaker(slug: &str, name: &str) -> RawProduct {
    RawProduct::Goat(GoatProduct {
        id: Some(format!("id-{slug}")),
        slug: Some(slug.to_owned()),
        name: Some(name.to_owned()),
        image_url: Some(format!("https://images.example.com/{slug}.png")),
        ..GoatProduct::default()
    })
}
