//! Field-level deserializers that never fail on a type mismatch.
//!
//! The aggregator's payloads disagree across sources and even across items of
//! the same source (ids arrive as strings or integers, prices as integers or
//! floats). Each helper reads the field as a raw JSON value and keeps it only
//! when it has a usable shape; anything else becomes absent.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use sole_core::Variant;

/// A string field; non-strings are dropped.
pub(crate) fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// An identifier sent either as a string or as an integer.
///
/// Strings are taken as-is, integers are stringified, anything else
/// (floats, objects, null) is absent.
pub(crate) fn id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => n
            .as_i64()
            .map(|i| i.to_string())
            .or_else(|| n.as_u64().map(|u| u.to_string())),
        _ => None,
    })
}

/// A price reported as an integer or a float, kept in whole dollars.
///
/// Floats are truncated toward zero (`199.9` becomes `199`), never rounded.
pub(crate) fn whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => truncate_number(&n),
        _ => None,
    })
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_number(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    n.as_f64()
        .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f.trunc() as i64)
}

pub(crate) fn boolean<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_bool())
}

/// A size label. Numeric sizes are rendered back into their JSON text so that
/// `10` and `"10"` compare equal against a stored preference.
pub(crate) fn size<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// A list of strings; a non-list is empty and non-string elements are skipped.
pub(crate) fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Per-size asks; elements that are not objects are skipped.
pub(crate) fn variants<'de, D>(deserializer: D) -> Result<Vec<Variant>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<RawVariant> = list(Value::deserialize(deserializer)?);
    Ok(raw.into_iter().map(Variant::from).collect())
}

/// The `USD` member of a `{"USD": "150"}` retail price object, as sent.
pub(crate) fn usd_price<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(mut map) => match map.remove("USD") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    })
}

/// Decodes each element of a JSON array into `T`, skipping elements that do
/// not fit. A non-array value yields an empty list.
pub(crate) fn list<T: DeserializeOwned>(value: Value) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping undecodable list element");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Deserialize)]
struct RawVariant {
    #[serde(default, deserialize_with = "size")]
    size: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    lowest_ask: Option<i64>,
    #[serde(default, deserialize_with = "boolean")]
    available: Option<bool>,
}

impl From<RawVariant> for Variant {
    fn from(raw: RawVariant) -> Self {
        Variant {
            size: raw.size,
            lowest_ask: raw.lowest_ask,
            available: raw.available,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "id")]
        id: Option<String>,
        #[serde(default, deserialize_with = "whole_number")]
        price: Option<i64>,
        #[serde(default, deserialize_with = "strings")]
        images: Vec<String>,
        #[serde(default, deserialize_with = "variants")]
        variants: Vec<Variant>,
        #[serde(default, deserialize_with = "usd_price")]
        retail: Option<String>,
    }

    fn sample(value: serde_json::Value) -> Sample {
        serde_json::from_value(value).expect("lenient decode never fails on an object")
    }

    #[test]
    fn id_accepts_string_and_integer() {
        assert_eq!(sample(json!({"id": "abc"})).id.as_deref(), Some("abc"));
        assert_eq!(sample(json!({"id": 981_234})).id.as_deref(), Some("981234"));
    }

    #[test]
    fn id_drops_other_shapes() {
        assert!(sample(json!({"id": 1.5})).id.is_none());
        assert!(sample(json!({"id": {"nested": true}})).id.is_none());
        assert!(sample(json!({"id": null})).id.is_none());
        assert!(sample(json!({})).id.is_none());
    }

    #[test]
    fn whole_number_truncates_floats() {
        assert_eq!(sample(json!({"price": 199.9})).price, Some(199));
        assert_eq!(sample(json!({"price": 150})).price, Some(150));
        assert_eq!(sample(json!({"price": -3.7})).price, Some(-3));
    }

    #[test]
    fn whole_number_drops_strings() {
        assert!(sample(json!({"price": "150"})).price.is_none());
    }

    #[test]
    fn strings_skips_non_string_elements() {
        let p = sample(json!({"images": ["a.png", 3, null, "b.png"]}));
        assert_eq!(p.images, vec!["a.png", "b.png"]);
        assert!(sample(json!({"images": "a.png"})).images.is_empty());
    }

    #[test]
    fn variants_decode_leniently() {
        let p = sample(json!({
            "variants": [
                {"size": "9", "lowest_ask": 100.75, "available": true},
                "garbage",
                {"size": 10.5, "lowest_ask": "n/a"},
                {}
            ]
        }));
        assert_eq!(p.variants.len(), 3);
        assert_eq!(p.variants[0].lowest_ask, Some(100));
        assert_eq!(p.variants[0].available, Some(true));
        assert_eq!(p.variants[1].size.as_deref(), Some("10.5"));
        assert!(p.variants[1].lowest_ask.is_none());
        assert_eq!(p.variants[2], Variant::default());
    }

    #[test]
    fn usd_price_reads_string_member_only() {
        assert_eq!(
            sample(json!({"retail": {"USD": "150"}})).retail.as_deref(),
            Some("150")
        );
        assert!(sample(json!({"retail": {"USD": 150}})).retail.is_none());
        assert!(sample(json!({"retail": {"EUR": "140"}})).retail.is_none());
        assert!(sample(json!({"retail": []})).retail.is_none());
    }
}
