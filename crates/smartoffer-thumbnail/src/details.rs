//! Image details derived from an extracted offer and its source text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use smartoffer_core::{OfferData, OfferRules, RuleLabel};
use tracing::debug;

static PRODUCT_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:on|for)\s+([^.]+?)(?:\s+and\s+get|\s+between|\.|$)").unwrap()
});

/// Brand, products and category used to pick and decorate a thumbnail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageDetails {
    pub extracted_brand: String,
    pub extracted_products: Vec<String>,
    pub extracted_category: String,
    pub extracted_rules: OfferRules,
}

impl ImageDetails {
    pub fn from_offer(offer: &OfferData, input_text: &str) -> Self {
        let extracted_brand = offer
            .offer_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();

        let mut extracted_products: Vec<String> = offer
            .offer_rules
            .get(RuleLabel::EligibleProducts)
            .map(|products| {
                products
                    .split(" and ")
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if extracted_products.is_empty() {
            if let Some(m) = PRODUCT_PHRASE_RE.captures(input_text).and_then(|c| c.get(1)) {
                let product = m.as_str().trim();
                if !product.is_empty() {
                    extracted_products.push(product.to_string());
                }
            }
        }

        let all_text = format!("{} {}", input_text, offer.offer_name).to_lowercase();
        let extracted_category =
            category_for(&all_text, mentions_laundry(&extracted_products)).to_string();

        debug!(
            "Image details: brand={:?} products={:?} category={:?}",
            extracted_brand, extracted_products, extracted_category
        );

        Self {
            extracted_brand,
            extracted_products,
            extracted_category,
            extracted_rules: offer.offer_rules.clone(),
        }
    }

    /// True when any product mentions a washer or dryer.
    pub fn has_laundry_product(&self) -> bool {
        mentions_laundry(&self.extracted_products)
    }
}

pub(crate) fn mentions_laundry(products: &[String]) -> bool {
    products.iter().any(|p| {
        let p = p.to_lowercase();
        p.contains("washer") || p.contains("dryer")
    })
}

fn category_for(all_text: &str, laundry: bool) -> &'static str {
    let has = |words: &[&str]| words.iter().any(|w| all_text.contains(w));

    if has(&["appliance"]) || laundry {
        "appliances"
    } else if has(&["clothing", "jeans", "denim"]) {
        "clothing"
    } else if has(&["shoes", "sneakers"]) {
        "footwear"
    } else if has(&["electronics", "tech"]) {
        "electronics"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(name: &str, rules: &[(&str, &str)]) -> OfferData {
        OfferData {
            offer_name: name.into(),
            offer_rules: rules.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_products_from_eligible_rule() {
        let o = offer("Kenmore Appliances", &[("Eligible Products", "Washer and Dryers")]);
        let details = ImageDetails::from_offer(&o, "anything");
        assert_eq!(details.extracted_brand, "Kenmore");
        assert_eq!(details.extracted_products, vec!["Washer", "Dryers"]);
        assert_eq!(details.extracted_category, "appliances");
        assert!(details.has_laundry_product());
        assert_eq!(details.extracted_rules.len(), 1);
    }

    #[test]
    fn test_products_from_text_phrase() {
        let o = offer("Levi's Jeans", &[]);
        let details = ImageDetails::from_offer(
            &o,
            "Save on Levi's 501 jeans and get 10% back in points between May 1 and May 5",
        );
        assert_eq!(details.extracted_products, vec!["Levi's 501 jeans"]);
        assert_eq!(details.extracted_category, "clothing");
    }

    #[test]
    fn test_categories() {
        let footwear = ImageDetails::from_offer(&offer("Nike Shoes", &[]), "new sneakers");
        assert_eq!(footwear.extracted_category, "footwear");

        let tech = ImageDetails::from_offer(&offer("", &[]), "big tech week");
        assert_eq!(tech.extracted_category, "electronics");
        assert_eq!(tech.extracted_brand, "");

        let none = ImageDetails::from_offer(&offer("Acme", &[]), "hello");
        assert_eq!(none.extracted_category, "");
        assert!(none.extracted_products.is_empty());
    }
}
