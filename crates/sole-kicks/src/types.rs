//! Raw product records as the aggregator returns them.
//!
//! Every field is optional and decoded through [`crate::lenient`], so a record
//! with a surprising shape degrades to missing fields instead of failing the
//! whole response.

use serde::Deserialize;

use sole_core::{SneakerSource, Variant};

use crate::lenient;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StockXProduct {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub product_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub gallery: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient::whole_number")]
    pub min_price: Option<i64>,
    #[serde(default, deserialize_with = "lenient::whole_number")]
    pub max_price: Option<i64>,
    #[serde(default, deserialize_with = "lenient::whole_number")]
    pub avg_price: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub release_date: Option<String>,
    /// Listing timestamp; the only date StockX detail payloads carry.
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::variants")]
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GoatProduct {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub colorway: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub product_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub link: Option<String>,
    /// `retail_prices.USD` exactly as sent; parsed during normalization.
    #[serde(
        rename = "retail_prices",
        default,
        deserialize_with = "lenient::usd_price"
    )]
    pub retail_price_usd: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::variants")]
    pub variants: Vec<Variant>,
}

/// A product record tagged with the marketplace it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawProduct {
    StockX(StockXProduct),
    Goat(GoatProduct),
}

impl RawProduct {
    /// Decodes a single JSON object as a record of `source`.
    ///
    /// # Errors
    ///
    /// Fails only when `value` is not a JSON object.
    pub fn from_value(
        source: SneakerSource,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(serde::de::Error::custom("expected a product object"));
        }
        Ok(match source {
            SneakerSource::Stockx => RawProduct::StockX(serde_json::from_value(value)?),
            SneakerSource::Goat => RawProduct::Goat(serde_json::from_value(value)?),
        })
    }

    #[must_use]
    pub fn source(&self) -> SneakerSource {
        match self {
            RawProduct::StockX(_) => SneakerSource::Stockx,
            RawProduct::Goat(_) => SneakerSource::Goat,
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            RawProduct::StockX(p) => p.id.as_deref(),
            RawProduct::Goat(p) => p.id.as_deref(),
        }
    }

    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        match self {
            RawProduct::StockX(p) => p.slug.as_deref(),
            RawProduct::Goat(p) => p.slug.as_deref(),
        }
    }

    #[must_use]
    pub fn product_type(&self) -> Option<&str> {
        match self {
            RawProduct::StockX(p) => p.product_type.as_deref(),
            RawProduct::Goat(p) => p.product_type.as_deref(),
        }
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        match self {
            RawProduct::StockX(p) => p.category.as_deref(),
            RawProduct::Goat(p) => p.category.as_deref(),
        }
    }

    /// The product's name for classification: `name`, falling back to `title`.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        match self {
            RawProduct::StockX(p) => p.title.as_deref(),
            RawProduct::Goat(p) => p.name.as_deref().or(p.title.as_deref()),
        }
    }

    #[must_use]
    pub fn min_price(&self) -> Option<i64> {
        match self {
            RawProduct::StockX(p) => p.min_price,
            RawProduct::Goat(_) => None,
        }
    }

    #[must_use]
    pub fn avg_price(&self) -> Option<i64> {
        match self {
            RawProduct::StockX(p) => p.avg_price,
            RawProduct::Goat(_) => None,
        }
    }

    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        match self {
            RawProduct::StockX(p) => &p.variants,
            RawProduct::Goat(p) => &p.variants,
        }
    }

    /// Whether the record carries any price signal at all.
    #[must_use]
    pub fn has_price(&self) -> bool {
        self.min_price().is_some_and(|p| p > 0)
            || self.avg_price().is_some_and(|p| p > 0)
            || !self.variants().is_empty()
    }
}
