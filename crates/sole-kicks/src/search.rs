//! Dual-marketplace search.
//!
//! A search fans out to StockX and GOAT concurrently. Each branch runs the
//! same pipeline: fetch, keep footwear, move priced records ahead of unpriced
//! ones, project to list rows, drop rows that cannot be displayed. A failing
//! branch is reported alongside the other branch's results instead of failing
//! the whole search.

use std::sync::Arc;

use serde::Serialize;

use sole_core::{SearchSource, SneakerSearchResult, SneakerSource};

use crate::api::{MarketplaceApi, ProductQuery};
use crate::classify::is_sneaker;
use crate::error::KicksError;
use crate::normalize::to_search_result;
use crate::types::RawProduct;

/// Parameters for one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub keyword: Option<String>,
    pub brand: Option<String>,
    pub source: SearchSource,
    pub limit: u32,
    pub page: u32,
    /// Preferred size for GOAT pricing.
    pub user_size: Option<String>,
}

impl SearchRequest {
    /// Free-text search across the selected marketplaces.
    #[must_use]
    pub fn keyword(keyword: impl Into<String>, source: SearchSource, limit: u32) -> Self {
        Self {
            keyword: Some(keyword.into()),
            brand: None,
            source,
            limit,
            page: 1,
            user_size: None,
        }
    }

    /// Brand-filtered listing with no keyword.
    #[must_use]
    pub fn brand(brand: impl Into<String>, source: SearchSource, limit: u32) -> Self {
        Self {
            keyword: None,
            brand: Some(brand.into()),
            source,
            limit,
            page: 1,
            user_size: None,
        }
    }

    /// The home-screen listing: one brand from both marketplaces.
    #[must_use]
    pub fn curated(brand: impl Into<String>, limit: u32) -> Self {
        Self::brand(brand, SearchSource::Both, limit)
    }

    #[must_use]
    pub fn with_user_size(mut self, size: Option<String>) -> Self {
        self.user_size = size.filter(|s| !s.is_empty());
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    fn product_query(&self) -> ProductQuery {
        let mut query = ProductQuery::new(self.limit).with_page(self.page);
        if let Some(keyword) = self.keyword.as_deref().filter(|k| !k.is_empty()) {
            query = query.with_query(keyword);
        }
        if let Some(brand) = self.brand.as_deref().filter(|b| !b.is_empty()) {
            query = query.with_brand(brand);
        }
        query
    }
}

/// A marketplace branch that failed during a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub source: SneakerSource,
    pub status: Option<u16>,
    pub message: String,
}

/// Per-marketplace results of a search, each in pipeline order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub stockx: Vec<SneakerSearchResult>,
    pub goat: Vec<SneakerSearchResult>,
    pub failures: Vec<SourceFailure>,
    #[serde(skip)]
    pub requested: SearchSource,
}

impl SearchOutcome {
    /// Both lists merged by alternation, StockX first.
    #[must_use]
    pub fn interleaved(&self) -> Vec<SneakerSearchResult> {
        interleave(self.stockx.clone(), self.goat.clone())
    }

    /// Whether every requested branch failed. An empty but successful
    /// branch does not count as a failure.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        !self.failures.is_empty()
            && SneakerSource::ALL
                .into_iter()
                .filter(|s| self.requested.includes(*s))
                .all(|s| self.failures.iter().any(|f| f.source == s))
    }
}

/// Alternates `a[0], b[0], a[1], b[1], ...`, then appends whatever remains
/// of the longer list.
#[must_use]
pub fn interleave<T>(a: Vec<T>, b: Vec<T>) -> Vec<T> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    loop {
        match (a.next(), b.next()) {
            (None, None) => break,
            (x, y) => merged.extend(x.into_iter().chain(y)),
        }
    }
    merged
}

/// Runs searches against a [`MarketplaceApi`].
pub struct SearchOrchestrator<A> {
    api: Arc<A>,
}

impl<A> Clone for SearchOrchestrator<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

impl<A: MarketplaceApi> SearchOrchestrator<A> {
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Searches every marketplace the request selects, concurrently.
    pub async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        let query = request.product_query();
        let user_size = request.user_size.as_deref();

        let (stockx, goat) = tokio::join!(
            self.branch(SneakerSource::Stockx, request.source, &query, None),
            self.branch(SneakerSource::Goat, request.source, &query, user_size),
        );

        let mut outcome = SearchOutcome {
            requested: request.source,
            ..SearchOutcome::default()
        };
        for (source, result) in [(SneakerSource::Stockx, stockx), (SneakerSource::Goat, goat)] {
            match result {
                Ok(rows) => match source {
                    SneakerSource::Stockx => outcome.stockx = rows,
                    SneakerSource::Goat => outcome.goat = rows,
                },
                Err(e) => {
                    tracing::warn!(%source, error = %e, "marketplace search failed");
                    outcome.failures.push(SourceFailure {
                        source,
                        status: e.status(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            stockx = outcome.stockx.len(),
            goat = outcome.goat.len(),
            failures = outcome.failures.len(),
            "search complete"
        );
        outcome
    }

    /// Searches a single marketplace and returns its rows or its error.
    ///
    /// # Errors
    ///
    /// Propagates the [`KicksError`] from the upstream call.
    pub async fn search_source(
        &self,
        source: SneakerSource,
        request: &SearchRequest,
    ) -> Result<Vec<SneakerSearchResult>, KicksError> {
        let query = request.product_query();
        let user_size = match source {
            SneakerSource::Goat => request.user_size.as_deref(),
            SneakerSource::Stockx => None,
        };
        self.run_pipeline(source, &query, user_size).await
    }

    async fn branch(
        &self,
        source: SneakerSource,
        selected: SearchSource,
        query: &ProductQuery,
        user_size: Option<&str>,
    ) -> Result<Vec<SneakerSearchResult>, KicksError> {
        if !selected.includes(source) {
            return Ok(Vec::new());
        }
        self.run_pipeline(source, query, user_size).await
    }

    async fn run_pipeline(
        &self,
        source: SneakerSource,
        query: &ProductQuery,
        user_size: Option<&str>,
    ) -> Result<Vec<SneakerSearchResult>, KicksError> {
        let raw = self.api.fetch_products(source, query).await?;
        let fetched = raw.len();
        let rows = rank_and_project(raw, user_size);
        tracing::debug!(%source, fetched, kept = rows.len(), "search branch filtered");
        Ok(rows)
    }
}

/// Footwear filter, stable priced-first ordering, projection and display
/// filter, in that order.
#[must_use]
pub fn rank_and_project(raw: Vec<RawProduct>, user_size: Option<&str>) -> Vec<SneakerSearchResult> {
    let (mut priced, unpriced): (Vec<_>, Vec<_>) = raw
        .into_iter()
        .filter(is_sneaker)
        .partition(RawProduct::has_price);
    priced.extend(unpriced);

    priced
        .into_iter()
        .map(|p| to_search_result(p, user_size))
        .filter(SneakerSearchResult::is_displayable)
        .collect()
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
