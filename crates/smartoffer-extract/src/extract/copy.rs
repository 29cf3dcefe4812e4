//! Headline/bodyline selection. Deterministic lookup, nothing is parsed from the text.

use crate::catalog::{contains_word, BrandCatalog, BrandEntry, CopyLine, GENERIC_COPY};

/// Pick marketing copy: the detected brand's copy key first, then the first
/// keyword rule with a whole-word hit, then the generic line.
pub fn generate_copy(
    text_lower: &str,
    brand: Option<&BrandEntry>,
    catalog: &BrandCatalog,
) -> CopyLine {
    let key = brand
        .and_then(|b| b.copy.as_deref())
        .or_else(|| {
            catalog
                .copy_keywords
                .iter()
                .find(|rule| {
                    rule.keywords
                        .iter()
                        .any(|k| contains_word(text_lower, &k.to_lowercase()))
                })
                .map(|rule| rule.copy.as_str())
        })
        .unwrap_or(GENERIC_COPY);
    catalog.copy_for(key)
}
