//! Offer name: known brand (plus category suffix) or the words before "offer"/"sale"/"deal".

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::catalog::{BrandCatalog, BrandEntry};

const MAX_GENERIC_NAME_CHARS: usize = 30;

static GENERIC_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\w+(?:\s+\w+)*)\s+(?:offer|sale|deal|promotion)\b").unwrap()
});

/// Returns the offer name and the catalog brand it was derived from, if any.
pub fn extract_offer_name<'a>(
    text: &str,
    text_lower: &str,
    catalog: &'a BrandCatalog,
) -> (String, Option<&'a BrandEntry>) {
    if let Some(brand) = catalog.find_brand(text_lower) {
        let name = match &brand.category {
            Some(cat) if text_lower.contains(&cat.keyword.to_lowercase()) => {
                format!("{} {}", brand.name, cat.suffix)
            }
            _ => brand.name.clone(),
        };
        debug!("Offer name from brand catalog: {}", name);
        return (name, Some(brand));
    }

    let name = GENERIC_NAME_RE
        .captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().chars().take(MAX_GENERIC_NAME_CHARS).collect::<String>())
        .map(|s| s.trim_end().to_string())
        .unwrap_or_default();
    if !name.is_empty() {
        debug!("Offer name from generic pattern: {}", name);
    }
    (name, None)
}
