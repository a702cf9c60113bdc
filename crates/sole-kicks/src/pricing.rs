//! Display price resolution and per-size price maps.

use std::collections::BTreeMap;

use sole_core::{format_price, ResellPrices, SneakerSource, Variant, PRICE_UNAVAILABLE};

use crate::types::RawProduct;

/// Resolves the list-screen price for a raw record.
///
/// `user_size` only applies to GOAT; StockX listing payloads carry aggregate
/// prices rather than per-size asks.
#[must_use]
pub fn resolve_display_price(product: &RawProduct, user_size: Option<&str>) -> String {
    match product {
        RawProduct::StockX(p) => stockx_display_price(p.avg_price, p.min_price),
        RawProduct::Goat(p) => format_price(goat_price(&p.variants, user_size)),
    }
}

/// Average price if positive, otherwise the minimum if positive.
#[must_use]
pub fn stockx_display_price(avg: Option<i64>, min: Option<i64>) -> String {
    match (avg.filter(|p| *p > 0), min.filter(|p| *p > 0)) {
        (Some(price), _) | (None, Some(price)) => format_price(Some(price)),
        (None, None) => PRICE_UNAVAILABLE.to_string(),
    }
}

/// Picks the GOAT price to show.
///
/// An exact size match with a positive ask wins. Otherwise the ask of the
/// smallest numeric size among positively priced variants is used;
/// variants whose size is missing or not numeric rank after every numeric
/// size, in their original order.
#[must_use]
pub fn goat_price(variants: &[Variant], user_size: Option<&str>) -> Option<i64> {
    let priced = || {
        variants
            .iter()
            .filter_map(|v| v.lowest_ask.filter(|ask| *ask > 0).map(|ask| (v, ask)))
    };

    if let Some(size) = user_size {
        if let Some((_, ask)) = priced().find(|(v, _)| v.size.as_deref() == Some(size)) {
            return Some(ask);
        }
    }

    priced()
        .filter_map(|(v, ask)| numeric_size(v).map(|n| (n, ask)))
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, ask)| ask)
        .or_else(|| priced().next().map(|(_, ask)| ask))
}

/// Lowest ask across all variants that report one.
#[must_use]
pub fn lowest_ask(variants: &[Variant]) -> Option<i64> {
    variants.iter().filter_map(|v| v.lowest_ask).min()
}

/// Builds `size -> {marketplace: ask}` from variants that carry both a size
/// and an ask. A repeated size keeps its last ask.
#[must_use]
pub fn build_size_price_map(variants: &[Variant], source: SneakerSource) -> ResellPrices {
    let mut map = ResellPrices::new();
    for variant in variants {
        if let (Some(size), Some(ask)) = (&variant.size, variant.lowest_ask) {
            map.insert(
                size.clone(),
                BTreeMap::from([(source.marketplace_key().to_string(), ask)]),
            );
        }
    }
    map
}

fn numeric_size(variant: &Variant) -> Option<f64> {
    variant
        .size
        .as_deref()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GoatProduct, StockXProduct};

    fn variant(size: Option<&str>, ask: Option<i64>) -> Variant {
        Variant {
            size: size.map(str::to_string),
            lowest_ask: ask,
            available: None,
        }
    }

    #[test]
    fn stockx_prefers_positive_average() {
        assert_eq!(stockx_display_price(Some(130), Some(110)), "$130");
    }

    #[test]
    fn stockx_falls_back_to_minimum() {
        assert_eq!(stockx_display_price(Some(0), Some(110)), "$110");
        assert_eq!(stockx_display_price(None, Some(110)), "$110");
    }

    #[test]
    fn stockx_without_prices_is_unavailable() {
        assert_eq!(stockx_display_price(Some(0), Some(-5)), PRICE_UNAVAILABLE);
        assert_eq!(stockx_display_price(None, None), PRICE_UNAVAILABLE);
    }

    #[test]
    fn stockx_ignores_user_size() {
        let p = RawProduct::StockX(StockXProduct {
            min_price: Some(100),
            variants: vec![variant(Some("10"), Some(999))],
            ..StockXProduct::default()
        });
        assert_eq!(resolve_display_price(&p, Some("10")), "$100");
    }

    #[test]
    fn goat_exact_size_match_wins() {
        let variants = vec![
            variant(Some("9"), Some(120)),
            variant(Some("10"), Some(150)),
        ];
        assert_eq!(goat_price(&variants, Some("10")), Some(150));
    }

    #[test]
    fn goat_size_match_requires_positive_ask() {
        let variants = vec![variant(Some("10"), Some(0)), variant(Some("11"), Some(160))];
        assert_eq!(goat_price(&variants, Some("10")), Some(160));
    }

    #[test]
    fn goat_size_match_is_exact_string() {
        let variants = vec![variant(Some("10.0"), Some(175)), variant(Some("9.5"), Some(140))];
        assert_eq!(goat_price(&variants, Some("10")), Some(140));
    }

    #[test]
    fn goat_falls_back_to_smallest_numeric_size() {
        let variants = vec![
            variant(Some("11"), Some(200)),
            variant(Some("8.5"), Some(190)),
            variant(Some("4"), None),
            variant(Some("10"), Some(180)),
        ];
        assert_eq!(goat_price(&variants, None), Some(190));
    }

    #[test]
    fn goat_non_numeric_sizes_sort_after_numeric() {
        let variants = vec![
            variant(Some("XL"), Some(50)),
            variant(None, Some(60)),
            variant(Some("12"), Some(210)),
        ];
        assert_eq!(goat_price(&variants, None), Some(210));
    }

    #[test]
    fn goat_only_non_numeric_keeps_original_order() {
        let variants = vec![variant(Some("XL"), Some(50)), variant(None, Some(60))];
        assert_eq!(goat_price(&variants, None), Some(50));
    }

    #[test]
    fn goat_without_positive_asks_is_unavailable() {
        let p = RawProduct::Goat(GoatProduct {
            variants: vec![variant(Some("10"), Some(0)), variant(Some("11"), None)],
            ..GoatProduct::default()
        });
        assert_eq!(resolve_display_price(&p, Some("10")), PRICE_UNAVAILABLE);
    }

    #[test]
    fn lowest_ask_ignores_missing() {
        let variants = vec![
            variant(Some("9"), None),
            variant(Some("10"), Some(220)),
            variant(Some("11"), Some(205)),
        ];
        assert_eq!(lowest_ask(&variants), Some(205));
        assert_eq!(lowest_ask(&[variant(Some("9"), None)]), None);
    }

    #[test]
    fn size_price_map_skips_incomplete_variants() {
        let variants = vec![
            variant(Some("9"), Some(120)),
            variant(None, Some(130)),
            variant(Some("10"), None),
        ];
        let map = build_size_price_map(&variants, SneakerSource::Goat);
        assert_eq!(map.len(), 1);
        assert_eq!(map["9"]["goat"], 120);
    }

    #[test]
    fn size_price_map_uses_marketplace_key() {
        let map = build_size_price_map(&[variant(Some("10"), Some(99))], SneakerSource::Stockx);
        assert_eq!(map["10"]["stockX"], 99);
    }
}
