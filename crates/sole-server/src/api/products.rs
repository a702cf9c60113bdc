use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use sole_core::Sneaker;
use sole_kicks::{normalize_product, resolve_product, ProductQuery};

use crate::middleware::RequestId;

use super::{map_kicks_error, normalize_limit, parse_source, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ProductListQuery {
    pub source: Option<String>,
    pub query: Option<String>,
    pub brand: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductDetailQuery {
    pub source: Option<String>,
}

/// Raw marketplace listing mapped onto the canonical shape. No footwear
/// filtering or ranking is applied here.
pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ProductListQuery>,
) -> Result<Json<ApiResponse<Vec<Sneaker>>>, ApiError> {
    let source = parse_source(params.source.as_deref())?;

    let mut query = ProductQuery::new(normalize_limit(params.limit, state.config.search_limit))
        .with_page(params.page.unwrap_or(1).max(1));
    if let Some(q) = params.query.filter(|q| !q.trim().is_empty()) {
        query = query.with_query(q);
    }
    if let Some(brand) = params.brand.filter(|b| !b.trim().is_empty()) {
        query = query.with_brand(brand);
    }

    let raw = state
        .kicks
        .search_products(source, &query)
        .await
        .map_err(|e| map_kicks_error(&req_id, e))?;

    let data: Vec<Sneaker> = raw.into_iter().map(normalize_product).collect();
    tracing::info!(
        request_id = %req_id.0,
        %source,
        count = data.len(),
        "products listed"
    );
    Ok(ApiResponse::new(data, req_id))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Query(params): Query<ProductDetailQuery>,
) -> Result<Json<ApiResponse<Sneaker>>, ApiError> {
    let source = parse_source(params.source.as_deref())?;
    if id.trim().is_empty() {
        return Err(ApiError::bad_request("product id must not be empty"));
    }

    let sneaker = resolve_product(state.kicks.as_ref(), source, &id)
        .await
        .map_err(|e| map_kicks_error(&req_id, e))?;

    tracing::info!(
        request_id = %req_id.0,
        %source,
        style_id = %sneaker.style_id,
        "product resolved"
    );
    Ok(ApiResponse::new(sneaker, req_id))
}

#[cfg(test)]
#[path = "products_test.rs"]
mod tests;
