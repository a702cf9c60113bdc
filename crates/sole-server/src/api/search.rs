use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use sole_core::{SearchSource, SneakerSearchResult};
use sole_kicks::{SearchOutcome, SearchRequest, SourceFailure};

use crate::middleware::RequestId;

use super::{normalize_limit, ApiError, AppState, ResponseMeta};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum ResultMode {
    #[default]
    Separate,
    Interleaved,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub keyword: Option<String>,
    pub brand: Option<String>,
    pub source: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub size: Option<String>,
    #[serde(default)]
    pub mode: ResultMode,
}

#[derive(Debug, Deserialize)]
pub(super) struct CuratedQuery {
    pub source: Option<String>,
    pub size: Option<String>,
    #[serde(default)]
    pub mode: ResultMode,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum SearchData {
    Separate {
        stockx: Vec<SneakerSearchResult>,
        goat: Vec<SneakerSearchResult>,
    },
    Interleaved(Vec<SneakerSearchResult>),
}

/// Search envelope; `failures` lists marketplaces whose branch errored.
#[derive(Debug, Serialize)]
pub(super) struct SearchResponse {
    data: SearchData,
    failures: Vec<SourceFailure>,
    meta: ResponseMeta,
}

fn parse_search_source(source: Option<&str>) -> Result<SearchSource, ApiError> {
    source.map_or(Ok(SearchSource::Both), |s| {
        s.parse::<SearchSource>()
            .map_err(|_| ApiError::bad_request("source must be 'stockx', 'goat' or 'both'"))
    })
}

fn into_response(
    outcome: SearchOutcome,
    mode: ResultMode,
    req_id: RequestId,
) -> Result<Json<SearchResponse>, ApiError> {
    if outcome.all_failed() {
        tracing::warn!(
            request_id = %req_id.0,
            failures = outcome.failures.len(),
            "every marketplace failed"
        );
        let failures = serde_json::to_value(&outcome.failures)
            .map_err(|e| ApiError::internal(e.to_string()))?;
        return Err(
            ApiError::new(StatusCode::BAD_GATEWAY, "all marketplaces failed")
                .with_field("failures", failures),
        );
    }

    let data = match mode {
        ResultMode::Interleaved => SearchData::Interleaved(outcome.interleaved()),
        ResultMode::Separate => SearchData::Separate {
            stockx: outcome.stockx,
            goat: outcome.goat,
        },
    };
    Ok(Json(SearchResponse {
        data,
        failures: outcome.failures,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let source = parse_search_source(params.source.as_deref())?;
    let limit = normalize_limit(params.limit, state.config.search_limit);

    let keyword = params.keyword.filter(|k| !k.trim().is_empty());
    let brand = params.brand.filter(|b| !b.trim().is_empty());
    let request = match (keyword, brand) {
        (Some(keyword), brand) => SearchRequest {
            brand,
            ..SearchRequest::keyword(keyword, source, limit)
        },
        (None, Some(brand)) => SearchRequest::brand(brand, source, limit),
        (None, None) => return Err(ApiError::bad_request("keyword or brand is required")),
    }
    .with_page(params.page.unwrap_or(1))
    .with_user_size(params.size);

    tracing::info!(
        request_id = %req_id.0,
        keyword = ?request.keyword,
        brand = ?request.brand,
        ?source,
        "search requested"
    );
    let outcome = state.search.search(&request).await;
    into_response(outcome, params.mode, req_id)
}

pub(super) async fn curated(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<CuratedQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let source = parse_search_source(params.source.as_deref())?;
    let request = SearchRequest {
        source,
        ..SearchRequest::curated(state.config.curated_brand.clone(), state.config.curated_limit)
    }
    .with_user_size(params.size);

    tracing::info!(
        request_id = %req_id.0,
        brand = %state.config.curated_brand,
        ?source,
        "curated listing requested"
    );
    let outcome = state.search.search(&request).await;
    into_response(outcome, params.mode, req_id)
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
