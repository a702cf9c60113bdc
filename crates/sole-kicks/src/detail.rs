//! Single-product lookups: detail resolution and liked-items enrichment.

use futures::stream::{self, StreamExt};

use sole_core::{Sneaker, SneakerSource};

use crate::api::{MarketplaceApi, ProductQuery};
use crate::error::KicksError;
use crate::normalize::normalize_product;
use crate::types::RawProduct;

/// Marketplaces tried, in order, when enriching a liked `styleID`.
const LIKED_LOOKUP_ORDER: [SneakerSource; 2] = [SneakerSource::Goat, SneakerSource::Stockx];

/// Resolves one product on `source` by slug or id.
///
/// A direct lookup is tried first. If it answers 404 or with no data, the id
/// is used as a search keyword and the first hit is looked up again by its
/// slug (or its id when it has no slug).
///
/// # Errors
///
/// - [`KicksError::NotFound`] when the direct lookup misses and the search
///   has no hit, or the re-lookup returns no data.
/// - Any upstream error from the search or the re-lookup (a re-lookup 404
///   included), unchanged.
pub async fn resolve_product<A>(
    api: &A,
    source: SneakerSource,
    id: &str,
) -> Result<Sneaker, KicksError>
where
    A: MarketplaceApi,
{
    if let Some(product) = lookup(api, source, id).await? {
        return Ok(normalize_product(product));
    }

    tracing::debug!(%source, id, "direct lookup empty, falling back to search");
    let hits = api
        .fetch_products(source, &ProductQuery::new(1).with_query(id))
        .await?;
    let Some(key) = hits.first().and_then(lookup_key) else {
        return Err(KicksError::NotFound { id: id.to_string() });
    };

    match api.fetch_product(source, &key).await? {
        Some(product) => Ok(normalize_product(product)),
        None => Err(KicksError::NotFound { id: id.to_string() }),
    }
}

/// Fetches full records for liked `styleID`s, at most `concurrency` lookups
/// in flight.
///
/// Each id is tried on GOAT, then StockX. An id that neither marketplace
/// returns is left out of the result. Result order follows completion, not
/// input order.
pub async fn fetch_liked<A>(api: &A, style_ids: &[String], concurrency: usize) -> Vec<Sneaker>
where
    A: MarketplaceApi,
{
    let found: Vec<Sneaker> = stream::iter(style_ids.iter().cloned())
        .map(|id| async move { fetch_first_available(api, &id).await })
        .buffer_unordered(concurrency.max(1))
        .filter_map(|sneaker| async move { sneaker })
        .collect()
        .await;

    tracing::info!(
        requested = style_ids.len(),
        found = found.len(),
        "liked items fetched"
    );
    found
}

async fn fetch_first_available<A>(api: &A, id: &str) -> Option<Sneaker>
where
    A: MarketplaceApi,
{
    for source in LIKED_LOOKUP_ORDER {
        match api.fetch_product(source, id).await {
            Ok(Some(product)) => return Some(normalize_product(product)),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(%source, id, error = %e, "liked item lookup failed");
            }
        }
    }
    tracing::warn!(id, "liked item not found on any marketplace");
    None
}

/// Direct lookup where a 404 counts as "no data".
async fn lookup<A>(
    api: &A,
    source: SneakerSource,
    id: &str,
) -> Result<Option<RawProduct>, KicksError>
where
    A: MarketplaceApi,
{
    match api.fetch_product(source, id).await {
        Err(e) if e.is_not_found() => Ok(None),
        other => other,
    }
}

fn lookup_key(hit: &RawProduct) -> Option<String> {
    [hit.slug(), hit.id()]
        .into_iter()
        .flatten()
        .find(|k| !k.is_empty())
        .map(str::to_string)
}
