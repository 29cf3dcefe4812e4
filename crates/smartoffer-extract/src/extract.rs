//! Offer extraction: brand/name, copy, reward, dates, expiry and rules.
//!
//! Each sub-extractor scans the full input independently and fills a
//! disjoint part of the [`OfferData`]. A sub-extractor that finds nothing
//! leaves its fields at their empty defaults; only an unexpected panic inside
//! the extraction body surfaces as [`ExtractionError`].

pub mod copy;
pub mod dates;
pub mod expiry;
pub mod name;
pub mod reward;
pub mod rules;

use std::panic::{self, AssertUnwindSafe};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use smartoffer_core::config::{DEFAULT_MAX_INPUT_CHARS, DEFAULT_OFFER_YEAR};
use smartoffer_core::{OfferData, SmartOfferConfig};
use thiserror::Error;
use tracing::{debug, error};

use crate::catalog::BrandCatalog;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Internal extraction fault: {0}")]
    Internal(String),
}

impl From<ExtractionError> for smartoffer_core::Error {
    fn from(e: ExtractionError) -> Self {
        smartoffer_core::Error::Extraction(e.to_string())
    }
}

/// Tunables for a single extractor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Year assumed for dates without an explicit year.
    pub default_year: i32,
    /// Input beyond this many characters is ignored.
    pub max_input_chars: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            default_year: DEFAULT_OFFER_YEAR,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

impl From<&SmartOfferConfig> for ExtractOptions {
    fn from(config: &SmartOfferConfig) -> Self {
        Self {
            default_year: config.default_year,
            max_input_chars: config.max_input_chars,
        }
    }
}

/// The offer extractor: a brand catalog plus options.
#[derive(Debug, Clone, Default)]
pub struct OfferExtractor {
    catalog: BrandCatalog,
    options: ExtractOptions,
}

static DEFAULT_EXTRACTOR: Lazy<OfferExtractor> = Lazy::new(OfferExtractor::default);

/// Extract with the built-in catalog and default options.
pub fn extract(text: &str) -> Result<OfferData, ExtractionError> {
    DEFAULT_EXTRACTOR.extract(text)
}

impl OfferExtractor {
    pub fn new(catalog: BrandCatalog, options: ExtractOptions) -> Self {
        Self { catalog, options }
    }

    pub fn catalog(&self) -> &BrandCatalog {
        &self.catalog
    }

    pub fn options(&self) -> ExtractOptions {
        self.options
    }

    /// Extract structured offer data from free text.
    pub fn extract(&self, text: &str) -> Result<OfferData, ExtractionError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.extract_fields(text))).map_err(|payload| {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!("Offer extraction panicked: {}", msg);
            ExtractionError::Internal(msg)
        })
    }

    fn extract_fields(&self, text: &str) -> OfferData {
        let text = truncate_chars(text, self.options.max_input_chars).trim();
        if text.is_empty() {
            return OfferData::default();
        }
        let lower = text.to_lowercase();

        let mut offer = OfferData {
            offer_description: text.to_string(),
            ..Default::default()
        };

        let (offer_name, brand) = name::extract_offer_name(text, &lower, &self.catalog);
        offer.offer_name = offer_name;

        let copy = copy::generate_copy(&lower, brand, &self.catalog);
        offer.offer_headline = copy.headline;
        offer.offer_bodyline = copy.bodyline;

        if let Some(reward) = reward::extract_reward(text) {
            offer.earn_type = Some(reward.earn_type);
            offer.earn_amount = reward.amount;
            offer.earn_display_text = reward.display_text;
        }

        let dates = dates::extract_dates(text, self.options.default_year);
        offer.offer_start_date = dates.start;
        offer.offer_end_date = dates.end;

        offer.simple_point_expiry = expiry::extract_point_expiry(text).unwrap_or_default();
        offer.offer_rules = rules::extract_rules(text);

        debug!(
            name = %offer.offer_name,
            earn_type = ?offer.earn_type,
            earn_amount = %offer.earn_amount,
            rules = offer.offer_rules.len(),
            "Offer extraction complete"
        );
        offer
    }
}

/// Cut `text` to at most `max` characters on a char boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Wire shape of an extraction result: `{ success, data }` or `{ success, error }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<OfferData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<OfferData, ExtractionError>> for ExtractionEnvelope {
    fn from(result: Result<OfferData, ExtractionError>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(e) => Self {
                success: false,
                data: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartoffer_core::{EarnType, RuleLabel};

    const KENMORE: &str = "Kenmore appliance offer buy Kenmore appliance between July 15th and \
        July 22nd and get 15% back in points available for the next 30 days... member \
        segment_house_owner and Member Tier as VIP Gold. offer applicable only on Washer and Dryers";

    #[test]
    fn test_kenmore_scenario() {
        let offer = extract(KENMORE).unwrap();
        assert!(offer.offer_name.contains("Kenmore"));
        assert_eq!(offer.earn_type, Some(EarnType::Points));
        assert_eq!(offer.earn_amount, "150");
        assert_eq!(offer.earn_display_text, "15% back in points");
        assert_eq!(offer.offer_start_date, "2025-07-15");
        assert_eq!(offer.offer_end_date, "2025-07-22");
        assert_eq!(
            offer.simple_point_expiry,
            "Points expire 30 days after earning date"
        );
        assert_eq!(offer.offer_headline, "Appliance Deal!");
        assert_eq!(offer.offer_description, KENMORE);

        let rules = &offer.offer_rules;
        assert_eq!(rules.len(), 3);
        assert_eq!(rules.get(RuleLabel::CustomerSegment), Some("segment_house_owner"));
        assert_eq!(rules.get(RuleLabel::MembershipLevel), Some("VIP Gold"));
        assert_eq!(rules.get(RuleLabel::EligibleProducts), Some("Washer and Dryers"));
    }

    #[test]
    fn test_levis_age_segment() {
        let text = "levis offer buy levis jeans between July 15th and July 22nd and get 10% back \
            in points. Offer conditions is for member segment_Age_20_30 and Member Tier as VIP Gold";
        let offer = extract(text).unwrap();
        assert_eq!(
            offer.offer_rules.get(RuleLabel::CustomerSegment),
            Some("segment_Age_20_30")
        );
        assert_eq!(offer.offer_name, "Levi's Jeans");
        assert_eq!(offer.offer_headline, "Denim Savings!");
        assert_eq!(offer.earn_amount, "100");
    }

    #[test]
    fn test_dollar_back_in_points() {
        let offer = extract("get $50 back in points").unwrap();
        assert_eq!(offer.earn_type, Some(EarnType::Points));
        assert_eq!(offer.earn_amount, "50000");
    }

    #[test]
    fn test_points_beat_discount() {
        let offer = extract("20% off + earn 200 points per dollar").unwrap();
        assert_eq!(offer.earn_type, Some(EarnType::Points));
        assert_eq!(offer.earn_amount, "200");
    }

    #[test]
    fn test_empty_input() {
        let offer = extract("").unwrap();
        assert_eq!(offer, OfferData::default());
        assert!(offer.offer_rules.is_empty());

        let offer = extract("   \n\t ").unwrap();
        assert_eq!(offer, OfferData::default());
    }

    #[test]
    fn test_idempotent() {
        let extractor = OfferExtractor::default();
        let a = serde_json::to_string(&extractor.extract(KENMORE).unwrap()).unwrap();
        let b = serde_json::to_string(&extractor.extract(KENMORE).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_plain_text_gets_generic_copy() {
        let offer = extract("nothing to see here").unwrap();
        assert_eq!(offer.offer_headline, "Special Offer!");
        assert_eq!(offer.offer_name, "");
        assert_eq!(offer.earn_type, None);
        assert_eq!(offer.offer_description, "nothing to see here");
    }

    #[test]
    fn test_custom_year() {
        let extractor = OfferExtractor::new(
            BrandCatalog::default(),
            ExtractOptions {
                default_year: 2027,
                ..Default::default()
            },
        );
        let offer = extractor.extract("starting March 3rd").unwrap();
        assert_eq!(offer.offer_start_date, "2027-03-03");
        assert_eq!(offer.offer_end_date, "");
    }

    #[test]
    fn test_oversized_input_truncated() {
        let extractor = OfferExtractor::new(
            BrandCatalog::default(),
            ExtractOptions {
                max_input_chars: 10,
                ..Default::default()
            },
        );
        let offer = extractor.extract("get 5% off today and also 200 points per dollar").unwrap();
        assert_eq!(offer.offer_description, "get 5% off");
        assert_eq!(offer.earn_type, Some(EarnType::Percentage));
    }

    #[test]
    fn test_large_input_does_not_fail() {
        let text = "Nike sale 10% off. ".repeat(5_000);
        assert!(extract(&text).is_ok());
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_amount_after_date_keeps_assumed_year() {
        let offer = extract("between July 15th and July 22nd 2000 points per dollar").unwrap();
        assert_eq!(offer.offer_start_date, "2025-07-15");
        assert_eq!(offer.offer_end_date, "2025-07-22");
        assert_eq!(offer.earn_amount, "2000");

        let offer = extract("from July 1 to July 31 1000 bonus points").unwrap();
        assert_eq!(offer.offer_start_date, "2025-07-01");
        assert_eq!(offer.offer_end_date, "2025-07-31");
    }

    #[test]
    fn test_separated_dollar_points_beat_discount() {
        let offer = extract("get $1,000 back in points and 20% off").unwrap();
        assert_eq!(offer.earn_type, Some(EarnType::Points));
        assert_eq!(offer.earn_amount, "1000000");
        assert_eq!(offer.earn_display_text, "$1,000 back in points");
    }

    #[test]
    fn test_envelope_shape() {
        let ok: ExtractionEnvelope = extract("get $5 in points").into();
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["earnAmount"], "5000");
        assert!(json.get("error").is_none());

        let err: ExtractionEnvelope =
            Err::<OfferData, _>(ExtractionError::Internal("boom".into())).into();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("boom"));
        assert!(json.get("data").is_none());
    }
}
