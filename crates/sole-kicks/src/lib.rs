//! Marketplace aggregator client and the sneaker normalization pipeline.
//!
//! Raw StockX and GOAT records are fetched through [`KicksClient`], filtered
//! by [`classify`], mapped onto [`sole_core::Sneaker`] by [`normalize`] and
//! priced by [`pricing`]. [`search`] and [`detail`] compose those steps.

pub mod api;
pub mod classify;
pub mod client;
pub mod detail;
pub mod error;
mod lenient;
pub mod normalize;
pub mod pricing;
pub mod search;
pub mod types;

#[cfg(test)]
mod testing;

pub use api::{MarketplaceApi, ProductQuery};
pub use classify::{classify, is_sneaker, Verdict};
pub use client::KicksClient;
pub use detail::{fetch_liked, resolve_product};
pub use error::KicksError;
pub use normalize::{normalize_product, to_search_result};
pub use pricing::{build_size_price_map, resolve_display_price};
pub use search::{interleave, SearchOrchestrator, SearchOutcome, SearchRequest, SourceFailure};
pub use types::{GoatProduct, RawProduct, StockXProduct};
