//! HTTP client for the KicksDB marketplace aggregator.
//!
//! Wraps `reqwest` with the aggregator's URL scheme, the `Authorization`
//! header and the `{"data": ...}` response envelope. Non-2xx answers surface
//! as [`KicksError::Upstream`] carrying the upstream body so callers can relay
//! it unchanged.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url};
use serde_json::Value;

use sole_core::{AppConfig, SneakerSource};

use crate::api::{MarketplaceApi, ProductQuery};
use crate::error::KicksError;
use crate::types::RawProduct;

pub const DEFAULT_BASE_URL: &str = "https://api.kicks.dev/";

/// Characters left as-is when a slug is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Client for the aggregator's `/v3/{stockx,goat}/products` endpoints.
///
/// Use [`KicksClient::new`] for production or [`KicksClient::with_base_url`]
/// to point at a mock server in tests.
pub struct KicksClient {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
}

impl KicksClient {
    /// Creates a client pointed at the production aggregator.
    ///
    /// # Errors
    ///
    /// Returns [`KicksError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, KicksError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`KicksError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`KicksError::InvalidBaseUrl`] if `base_url`
    /// does not parse.
    pub fn with_base_url(
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, KicksError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so relative joins append to the path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| KicksError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.map(str::to_owned),
            base_url,
        })
    }

    /// Builds a client from application configuration.
    ///
    /// # Errors
    ///
    /// See [`KicksClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, KicksError> {
        Self::with_base_url(
            config.kicks_api_key.as_deref(),
            config.request_timeout_secs,
            &config.user_agent,
            &config.kicks_base_url,
        )
    }

    /// Lists products from one marketplace.
    ///
    /// Items that are not JSON objects are skipped; a missing `data` member
    /// yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`KicksError::Upstream`] on a non-2xx status.
    /// - [`KicksError::Http`] on network failure or timeout.
    /// - [`KicksError::Deserialize`] if the body is not JSON.
    pub async fn search_products(
        &self,
        source: SneakerSource,
        query: &ProductQuery,
    ) -> Result<Vec<RawProduct>, KicksError> {
        let url = self.products_url(source, query);
        tracing::debug!(%source, %url, "listing products");
        let body = self.request_json(&url).await?;
        let products = decode_list(source, body);
        tracing::debug!(%source, count = products.len(), "listed products");
        Ok(products)
    }

    /// Fetches a single product by slug.
    ///
    /// StockX is addressed by path; GOAT by a `slugs` filter whose `data` may
    /// be a single object or a list.
    ///
    /// # Errors
    ///
    /// Same as [`KicksClient::search_products`].
    pub async fn product_detail(
        &self,
        source: SneakerSource,
        id: &str,
    ) -> Result<Option<RawProduct>, KicksError> {
        let url = self.detail_url(source, id)?;
        tracing::debug!(%source, %url, "fetching product detail");
        let body = self.request_json(&url).await?;
        Ok(decode_single(source, body))
    }

    fn products_url(&self, source: SneakerSource, query: &ProductQuery) -> Url {
        let mut url = self.endpoint(source);
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(q) = query.query.as_deref().filter(|q| !q.is_empty()) {
                pairs.append_pair("query", q);
            }
            pairs.append_pair("limit", &query.limit.to_string());
            pairs.append_pair("page", &query.page.to_string());
            match source {
                SneakerSource::Stockx => {
                    pairs.append_pair("market", "US");
                    pairs.append_pair("display[prices]", "true");
                }
                SneakerSource::Goat => {
                    pairs.append_pair("display[variants]", "true");
                }
            }
            pairs.append_pair("currency", "USD");
            if let Some(filter) = query.filter_expression() {
                pairs.append_pair("filters", &filter);
            }
        }
        url
    }

    fn detail_url(&self, source: SneakerSource, id: &str) -> Result<Url, KicksError> {
        match source {
            SneakerSource::Stockx => {
                let path = format!(
                    "v3/stockx/products/{}",
                    utf8_percent_encode(id, PATH_SEGMENT)
                );
                let mut url = self
                    .base_url
                    .join(&path)
                    .map_err(|e| KicksError::InvalidBaseUrl {
                        base_url: self.base_url.to_string(),
                        reason: e.to_string(),
                    })?;
                url.query_pairs_mut()
                    .append_pair("display[variants]", "true")
                    .append_pair("display[prices]", "true")
                    .append_pair("market", "US")
                    .append_pair("currency", "USD");
                Ok(url)
            }
            SneakerSource::Goat => {
                let mut url = self.endpoint(source);
                url.query_pairs_mut()
                    .append_pair("slugs", id)
                    .append_pair("limit", "1")
                    .append_pair("currency", "USD")
                    .append_pair("display[variants]", "true");
                Ok(url)
            }
        }
    }

    fn endpoint(&self, source: SneakerSource) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v3", source.as_str(), "products"]);
        }
        url
    }

    /// Sends an authorized GET and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`KicksError::Upstream`] for a non-2xx status,
    /// [`KicksError::Http`] on transport failure and
    /// [`KicksError::Deserialize`] if a 2xx body is not JSON.
    async fn request_json(&self, url: &Url) -> Result<Value, KicksError> {
        let mut request = self.client.get(url.clone());
        if let Some(key) = &self.api_key {
            request = request.header(AUTHORIZATION, key);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| {
                let message = if text.trim().is_empty() {
                    status.canonical_reason().unwrap_or("upstream error").to_string()
                } else {
                    text.clone()
                };
                serde_json::json!({ "error": message })
            });
            tracing::debug!(status = status.as_u16(), %url, "upstream returned error status");
            return Err(KicksError::Upstream {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        serde_json::from_str(&text).map_err(|e| KicksError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

impl MarketplaceApi for KicksClient {
    async fn fetch_products(
        &self,
        source: SneakerSource,
        query: &ProductQuery,
    ) -> Result<Vec<RawProduct>, KicksError> {
        self.search_products(source, query).await
    }

    async fn fetch_product(
        &self,
        source: SneakerSource,
        id: &str,
    ) -> Result<Option<RawProduct>, KicksError> {
        self.product_detail(source, id).await
    }
}

fn take_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn decode_item(source: SneakerSource, item: Value) -> Option<RawProduct> {
    match RawProduct::from_value(source, item) {
        Ok(product) => Some(product),
        Err(e) => {
            tracing::debug!(%source, error = %e, "skipping malformed product record");
            None
        }
    }
}

fn decode_list(source: SneakerSource, body: Value) -> Vec<RawProduct> {
    match take_data(body) {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| decode_item(source, item))
            .collect(),
        _ => Vec::new(),
    }
}

fn decode_single(source: SneakerSource, body: Value) -> Option<RawProduct> {
    match take_data(body) {
        item @ Value::Object(_) => decode_item(source, item),
        Value::Array(items) => items
            .into_iter()
            .find_map(|item| decode_item(source, item)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
