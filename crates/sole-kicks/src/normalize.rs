//! Normalization from raw marketplace records to [`sole_core::Sneaker`].
//!
//! Price selection lives in [`crate::pricing`]; this module handles the
//! structural mapping of each marketplace's field names onto the shared shape.

use sole_core::{
    LowestResellPrice, ResellLinks, Sneaker, SneakerSearchResult, SneakerSource,
};

use crate::pricing::{build_size_price_map, lowest_ask, resolve_display_price};
use crate::types::{GoatProduct, RawProduct, StockXProduct};

/// Normalizes a raw record into a [`Sneaker`]. Never fails; missing fields
/// stay absent.
#[must_use]
pub fn normalize_product(product: RawProduct) -> Sneaker {
    match product {
        RawProduct::StockX(p) => normalize_stockx(p),
        RawProduct::Goat(p) => normalize_goat(p),
    }
}

/// Projects a raw record into a list row, pricing it for `user_size` where
/// the marketplace supports per-size prices.
#[must_use]
pub fn to_search_result(product: RawProduct, user_size: Option<&str>) -> SneakerSearchResult {
    let display_price = resolve_display_price(&product, user_size);
    let sneaker = normalize_product(product);
    SneakerSearchResult {
        thumbnail: sneaker.thumbnail().map(str::to_string),
        style_id: sneaker.style_id,
        sku: sneaker.sku,
        shoe_name: sneaker.shoe_name,
        colorway: sneaker.colorway,
        display_price,
        source: sneaker.source,
    }
}

fn normalize_stockx(p: StockXProduct) -> Sneaker {
    let resell_prices = build_size_price_map(&p.variants, SneakerSource::Stockx);
    let image_links = first_non_empty_list([p.gallery, single(p.image)]);

    Sneaker {
        style_id: style_id(p.slug.as_deref(), p.id.as_deref()),
        sku: p.id,
        shoe_name: first_present([p.title, p.model]).unwrap_or_default(),
        brand: present(p.brand),
        colorway: present(p.category),
        retail_price: None,
        release_date: first_present([p.release_date, p.created_at]),
        image_links,
        resell_links: ResellLinks {
            stock_x: present(p.link),
            goat: None,
        },
        lowest_resell_price: LowestResellPrice {
            stock_x: p.min_price,
            goat: None,
        },
        resell_prices,
        description: present(p.description),
        source: SneakerSource::Stockx,
        stock_x_min_price: p.min_price,
        stock_x_max_price: p.max_price,
        stock_x_avg_price: p.avg_price,
    }
}

fn normalize_goat(p: GoatProduct) -> Sneaker {
    let resell_prices = build_size_price_map(&p.variants, SneakerSource::Goat);
    let image_links = first_non_empty_list([p.images, single(p.image_url), single(p.image)]);
    // Only whole-number strings parse; "150.00" leaves the retail price absent.
    let retail_price = p
        .retail_price_usd
        .as_deref()
        .and_then(|usd| usd.trim().parse::<i64>().ok());

    Sneaker {
        style_id: style_id(p.slug.as_deref(), p.id.as_deref()),
        sku: p.id,
        shoe_name: first_present([p.title, p.name, p.model]).unwrap_or_default(),
        brand: present(p.brand),
        colorway: present(p.colorway),
        retail_price,
        release_date: present(p.release_date),
        image_links,
        resell_links: ResellLinks {
            stock_x: None,
            goat: present(p.link),
        },
        lowest_resell_price: LowestResellPrice {
            stock_x: None,
            goat: lowest_ask(&p.variants),
        },
        resell_prices,
        description: present(p.description),
        source: SneakerSource::Goat,
        stock_x_min_price: None,
        stock_x_max_price: None,
        stock_x_avg_price: None,
    }
}

/// Slug when non-empty, else the id, else empty.
fn style_id(slug: Option<&str>, id: Option<&str>) -> String {
    [slug, id]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn first_present<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates.into_iter().flatten().find(|s| !s.is_empty())
}

fn single(value: Option<String>) -> Vec<String> {
    present(value).into_iter().collect()
}

fn first_non_empty_list<const N: usize>(candidates: [Vec<String>; N]) -> Vec<String> {
    candidates
        .into_iter()
        .find(|list| !list.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
