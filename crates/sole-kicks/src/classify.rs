//! Footwear classifier.
//!
//! Marketplace search results mix sneakers with apparel and accessories from
//! the same brands. Classification is keyword based and evaluated in a fixed
//! order; the first rule that fires decides.

use crate::types::RawProduct;

/// `productType` values that always mark a record as footwear.
const FOOTWEAR_PRODUCT_TYPES: [&str; 2] = ["sneakers", "shoes"];

/// Substrings of `productType` that exclude a record.
const EXCLUDED_PRODUCT_TYPES: [&str; 11] = [
    "apparel",
    "clothing",
    "hoodie",
    "jacket",
    "shirt",
    "pants",
    "shorts",
    "accessories",
    "bag",
    "hat",
    "cap",
];

/// Substrings of the product name that exclude a record.
const EXCLUDED_NAME_KEYWORDS: [&str; 10] = [
    "hoodie",
    "jacket",
    "fleece",
    "windrunner",
    "crewneck",
    "sweatshirt",
    "tee",
    "t-shirt",
    "pants",
    "shorts",
];

/// Substrings of the name or category that mark a record as footwear.
const FOOTWEAR_KEYWORDS: [&str; 15] = [
    "air",
    "jordan",
    "dunk",
    "force",
    "yeezy",
    "boost",
    "slide",
    "sandal",
    "trainer",
    "runner",
    "sneaker",
    "shoe",
    "foamposite",
    "react",
    "zoom",
];

/// Which rule decided a record's classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// `productType` names footwear outright.
    FootwearType,
    ExcludedType(&'static str),
    ExcludedName(&'static str),
    /// First footwear keyword found in the name or category.
    Keyword(&'static str),
    /// Nothing matched, but the record has a name.
    Named,
    /// Nothing matched and the record has no name.
    Unnamed,
}

impl Verdict {
    #[must_use]
    pub fn is_sneaker(self) -> bool {
        matches!(
            self,
            Verdict::FootwearType | Verdict::Keyword(_) | Verdict::Named
        )
    }
}

/// Classifies a record. Matching is case-insensitive substring search.
#[must_use]
pub fn classify(product: &RawProduct) -> Verdict {
    let product_type = product.product_type().unwrap_or_default().to_lowercase();
    let name = product.display_name().unwrap_or_default().to_lowercase();
    let category = product.category().unwrap_or_default().to_lowercase();

    if FOOTWEAR_PRODUCT_TYPES.contains(&product_type.as_str()) {
        return Verdict::FootwearType;
    }
    if let Some(hit) = first_match(&EXCLUDED_PRODUCT_TYPES, &[&product_type]) {
        return Verdict::ExcludedType(hit);
    }
    if let Some(hit) = first_match(&EXCLUDED_NAME_KEYWORDS, &[&name]) {
        return Verdict::ExcludedName(hit);
    }
    if let Some(hit) = first_match(&FOOTWEAR_KEYWORDS, &[&name, &category]) {
        return Verdict::Keyword(hit);
    }
    if name.is_empty() {
        Verdict::Unnamed
    } else {
        Verdict::Named
    }
}

#[must_use]
pub fn is_sneaker(product: &RawProduct) -> bool {
    classify(product).is_sneaker()
}

fn first_match(keywords: &[&'static str], haystacks: &[&str]) -> Option<&'static str> {
    keywords
        .iter()
        .copied()
        .find(|kw| haystacks.iter().any(|h| h.contains(kw)))
}
