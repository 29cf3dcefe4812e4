//! Eligibility rules: membership level, customer segment, eligible products,
//! included categories, minimum purchase.
//!
//! Each check writes one label and only when that label is still empty, so
//! earlier patterns take precedence over later ones.

use once_cell::sync::Lazy;
use regex::Regex;
use smartoffer_core::{OfferRules, RuleLabel};
use tracing::debug;

static MEMBER_TIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bmember\s+tier\s+as\s+([^.]+)").unwrap());
static VIP_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bvip\s+([a-z]+)\b").unwrap());
static VIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bvip\b").unwrap());

static AGE_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)segment_(age_\d+_\d+)").unwrap());
static MEMBER_SEGMENT_DIRECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bmember\s+segment_([a-z0-9_]+)").unwrap());
static MEMBER_SEGMENT_AS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bmember\s+segment\s+as\s+(segment_+[a-z0-9_]+)").unwrap());
static GENERIC_SEGMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)segment[_\s]+(age_\d+_\d+|house_owner|[a-z0-9_]+)").unwrap()
});

static ELIGIBLE_PRODUCTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:\bapplicable\s+)?\bonly\s+on\s+([^.]+)").unwrap());
static INCLUDES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bincludes\s+([^.]+)").unwrap());
static MINIMUM_PURCHASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bminimum\s+purchase\s+(?:of\s+)?\$\s*(\d+(?:\.\d{1,2})?)").unwrap()
});

/// Run every rule check against `text`.
pub fn extract_rules(text: &str) -> OfferRules {
    let mut rules = OfferRules::new();
    extract_membership(text, &mut rules);
    if let Some(segment) = extract_segment(text) {
        debug!("Customer segment: {}", segment);
        rules.set_if_absent(RuleLabel::CustomerSegment, segment);
    }
    if let Some(products) = capture_trimmed(&ELIGIBLE_PRODUCTS_RE, text) {
        debug!("Eligible products: {}", products);
        rules.set_if_absent(RuleLabel::EligibleProducts, products);
    }
    if let Some(categories) = capture_trimmed(&INCLUDES_RE, text) {
        debug!("Included categories: {}", categories);
        rules.set_if_absent(RuleLabel::IncludedCategories, categories);
    }
    if let Some(amount) = capture_trimmed(&MINIMUM_PURCHASE_RE, text) {
        debug!("Minimum purchase: ${}", amount);
        rules.set_if_absent(RuleLabel::MinimumPurchase, format!("${}", amount));
    }
    rules
}

fn extract_membership(text: &str, rules: &mut OfferRules) {
    if let Some(tier) = capture_trimmed(&MEMBER_TIER_RE, text) {
        debug!("Member tier: {}", tier);
        rules.set_if_absent(RuleLabel::MembershipLevel, tier);
    }
    if text.to_lowercase().contains("premium members only") {
        rules.set_if_absent(RuleLabel::MembershipLevel, "Premium");
    }
    if rules.contains(RuleLabel::MembershipLevel) {
        return;
    }
    let vip_tier = capture_trimmed(&VIP_WORD_RE, text);
    match vip_tier {
        Some(word) => {
            rules.set_if_absent(RuleLabel::MembershipLevel, format!("VIP {}", word));
        }
        None if VIP_RE.is_match(text) => {
            rules.set_if_absent(RuleLabel::MembershipLevel, "VIP");
        }
        None => {}
    }
}

/// Segment detection in fixed priority order; first hit wins.
fn extract_segment(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    if lower.contains("segment_house_owner") {
        return Some("segment_house_owner".to_string());
    }
    if let Some(age) = capture_trimmed(&AGE_SEGMENT_RE, text) {
        return Some(format!("segment_{}", age));
    }
    if lower.contains("segment_fashion_lovers") {
        return Some("segment_fashion_lovers".to_string());
    }
    if let Some(token) = capture_trimmed(&MEMBER_SEGMENT_DIRECT_RE, text) {
        return Some(format!("segment_{}", token));
    }
    if let Some(segment) = capture_trimmed(&MEMBER_SEGMENT_AS_RE, text) {
        return Some(segment);
    }
    capture_trimmed(&GENERIC_SEGMENT_RE, text).map(|token| {
        if token.to_lowercase().starts_with("segment_") {
            token
        } else {
            format!("segment_{}", token)
        }
    })
}

fn capture_trimmed(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str) -> Option<String> {
        extract_rules(text)
            .get(RuleLabel::CustomerSegment)
            .map(str::to_string)
    }

    fn membership(text: &str) -> Option<String> {
        extract_rules(text)
            .get(RuleLabel::MembershipLevel)
            .map(str::to_string)
    }

    #[test]
    fn test_member_tier_up_to_period() {
        assert_eq!(
            membership("Member Tier as VIP Gold. offer applicable only on Washers"),
            Some("VIP Gold".into())
        );
    }

    #[test]
    fn test_premium_members_only() {
        assert_eq!(membership("For Premium Members Only!"), Some("Premium".into()));
        assert_eq!(
            membership("Member Tier as Platinum. premium members only"),
            Some("Platinum".into())
        );
    }

    #[test]
    fn test_vip_variants() {
        assert_eq!(membership("exclusive to VIP Silver holders"), Some("VIP Silver".into()));
        assert_eq!(membership("for vip members only"), Some("VIP members".into()));
        assert_eq!(membership("VIP 2 days early"), Some("VIP".into()));
        assert_eq!(membership("VIP."), Some("VIP".into()));
        assert_eq!(membership("a vipassana retreat"), None);
    }

    #[test]
    fn test_segment_priority() {
        assert_eq!(
            segment("segment_Age_20_30 and segment_house_owner"),
            Some("segment_house_owner".into())
        );
        assert_eq!(
            segment("member segment_Age_20_30 and segment_fashion_lovers"),
            Some("segment_Age_20_30".into())
        );
        assert_eq!(
            segment("member segment_gold_savers and segment_fashion_lovers"),
            Some("segment_fashion_lovers".into())
        );
    }

    #[test]
    fn test_segment_direct_and_as_forms() {
        assert_eq!(segment("member segment_new_movers"), Some("segment_new_movers".into()));
        assert_eq!(
            segment("member segment as segment__house_owner"),
            Some("segment__house_owner".into())
        );
    }

    #[test]
    fn test_segment_generic_normalized() {
        assert_eq!(segment("target segment students"), Some("segment_students".into()));
        assert_eq!(segment("Segment_pet_parents"), Some("segment_pet_parents".into()));
    }

    #[test]
    fn test_single_segment_value() {
        let rules = extract_rules(
            "member segment_a, member segment as segment__b, segment_Age_1_2, segment c",
        );
        assert_eq!(rules.iter().filter(|(k, _)| *k == "Customer Segment").count(), 1);
        assert_eq!(rules.get(RuleLabel::CustomerSegment), Some("segment_Age_1_2"));
    }

    #[test]
    fn test_products_categories_minimum() {
        let rules = extract_rules(
            "Offer applicable only on Washer and Dryers. Bundle includes dryer sheets and \
             lint traps. Minimum purchase $75.",
        );
        assert_eq!(rules.get(RuleLabel::EligibleProducts), Some("Washer and Dryers"));
        assert_eq!(
            rules.get(RuleLabel::IncludedCategories),
            Some("dryer sheets and lint traps")
        );
        assert_eq!(rules.get(RuleLabel::MinimumPurchase), Some("$75"));
    }

    #[test]
    fn test_minimum_purchase_of() {
        let rules = extract_rules("minimum purchase of $49.99 required");
        assert_eq!(rules.get(RuleLabel::MinimumPurchase), Some("$49.99"));
    }

    #[test]
    fn test_no_rules() {
        assert!(extract_rules("").is_empty());
        assert!(extract_rules("get 10% off sitewide").is_empty());
    }
}
