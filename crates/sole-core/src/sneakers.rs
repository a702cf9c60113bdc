use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Display value used wherever a price cannot be resolved.
pub const PRICE_UNAVAILABLE: &str = "—";

/// Per-size resale prices: `size -> marketplace -> whole-dollar price`.
///
/// The inner map holds a single marketplace key per normalization pass
/// (`"stockX"` or `"goat"`); the two sources are never merged into one record.
pub type ResellPrices = BTreeMap<String, BTreeMap<String, i64>>;

/// Marketplace a record was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SneakerSource {
    Stockx,
    Goat,
}

impl SneakerSource {
    pub const ALL: [SneakerSource; 2] = [SneakerSource::Stockx, SneakerSource::Goat];

    /// Lowercase tag used on the wire and in upstream URL paths.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SneakerSource::Stockx => "stockx",
            SneakerSource::Goat => "goat",
        }
    }

    /// Key used inside `resellPrices`, matching the `resellLinks` field names.
    #[must_use]
    pub fn marketplace_key(self) -> &'static str {
        match self {
            SneakerSource::Stockx => "stockX",
            SneakerSource::Goat => "goat",
        }
    }
}

impl std::fmt::Display for SneakerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SneakerSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stockx" => Ok(SneakerSource::Stockx),
            "goat" => Ok(SneakerSource::Goat),
            other => Err(CoreError::InvalidSource(other.to_string())),
        }
    }
}

/// Which marketplaces a search should fan out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    Stockx,
    Goat,
    #[default]
    Both,
}

impl SearchSource {
    #[must_use]
    pub fn includes(self, source: SneakerSource) -> bool {
        match self {
            SearchSource::Both => true,
            SearchSource::Stockx => source == SneakerSource::Stockx,
            SearchSource::Goat => source == SneakerSource::Goat,
        }
    }
}

impl From<SneakerSource> for SearchSource {
    fn from(source: SneakerSource) -> Self {
        match source {
            SneakerSource::Stockx => SearchSource::Stockx,
            SneakerSource::Goat => SearchSource::Goat,
        }
    }
}

impl FromStr for SearchSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stockx" => Ok(SearchSource::Stockx),
            "goat" => Ok(SearchSource::Goat),
            "both" => Ok(SearchSource::Both),
            other => Err(CoreError::InvalidSearchSource(other.to_string())),
        }
    }
}

/// A per-size ask attached to a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Raw size label exactly as the marketplace reports it (e.g. `"10.5"`).
    pub size: Option<String>,
    /// Lowest current ask in whole dollars.
    pub lowest_ask: Option<i64>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResellLinks {
    pub stock_x: Option<String>,
    pub goat: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowestResellPrice {
    pub stock_x: Option<i64>,
    pub goat: Option<i64>,
}

/// A marketplace product normalized into the shape shared by both sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sneaker {
    /// Slug when the marketplace provides one, otherwise the stringified id.
    /// Used as the like key and for de-duplication.
    #[serde(rename = "styleID")]
    pub style_id: String,
    /// Raw marketplace id; diverges from `style_id` whenever a slug exists.
    pub sku: Option<String>,
    pub shoe_name: String,
    pub brand: Option<String>,
    pub colorway: Option<String>,
    pub retail_price: Option<i64>,
    /// Passed through untouched; no date validation.
    pub release_date: Option<String>,
    pub image_links: Vec<String>,
    pub resell_links: ResellLinks,
    pub lowest_resell_price: LowestResellPrice,
    pub resell_prices: ResellPrices,
    pub description: Option<String>,
    pub source: SneakerSource,
    pub stock_x_min_price: Option<i64>,
    pub stock_x_max_price: Option<i64>,
    pub stock_x_avg_price: Option<i64>,
}

impl Sneaker {
    /// First image, if any.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.image_links.first().map(String::as_str)
    }

    /// Lowest ask for `size` on this record's own marketplace.
    #[must_use]
    pub fn price_for_size(&self, size: &str) -> Option<i64> {
        self.resell_prices
            .get(size)
            .and_then(|prices| prices.get(self.source.marketplace_key()))
            .copied()
    }
}

/// Display-only projection of a product used by list screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SneakerSearchResult {
    #[serde(rename = "styleID")]
    pub style_id: String,
    pub sku: Option<String>,
    pub shoe_name: String,
    pub colorway: Option<String>,
    pub thumbnail: Option<String>,
    /// Pre-formatted price (`"$150"`) or [`PRICE_UNAVAILABLE`].
    pub display_price: String,
    pub source: SneakerSource,
}

impl SneakerSearchResult {
    /// A result can be shown only with a name and a non-empty thumbnail.
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        !self.shoe_name.is_empty() && self.thumbnail.as_deref().is_some_and(|t| !t.is_empty())
    }

    #[must_use]
    pub fn has_known_price(&self) -> bool {
        self.display_price != PRICE_UNAVAILABLE
    }
}

/// Formats a whole-dollar price, or the unavailable sentinel when absent.
#[must_use]
pub fn format_price(price: Option<i64>) -> String {
    match price {
        Some(p) => format!("${p}"),
        None => PRICE_UNAVAILABLE.to_string(),
    }
}
