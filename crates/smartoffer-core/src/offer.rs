//! Offer data model shared by the extractor, the remote path and the UI API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Reward mechanism of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EarnType {
    Points,
    Percentage,
    Cashback,
    Fixed,
}

impl EarnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EarnType::Points => "points",
            EarnType::Percentage => "percentage",
            EarnType::Cashback => "cashback",
            EarnType::Fixed => "fixed",
        }
    }

    /// Lenient parse used for untrusted input. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "points" | "point" => Some(EarnType::Points),
            "percentage" | "percent" => Some(EarnType::Percentage),
            "cashback" => Some(EarnType::Cashback),
            "fixed" => Some(EarnType::Fixed),
            _ => None,
        }
    }
}

impl std::fmt::Display for EarnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed vocabulary of eligibility rule labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleLabel {
    MembershipLevel,
    CustomerSegment,
    EligibleProducts,
    IncludedCategories,
    MinimumPurchase,
}

impl RuleLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleLabel::MembershipLevel => "Membership Level Required",
            RuleLabel::CustomerSegment => "Customer Segment",
            RuleLabel::EligibleProducts => "Eligible Products",
            RuleLabel::IncludedCategories => "Included Categories",
            RuleLabel::MinimumPurchase => "Minimum Purchase",
        }
    }
}

impl std::fmt::Display for RuleLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule label → rule value. Each label holds at most one value and the first
/// value written for a label is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferRules(BTreeMap<String, String>);

impl OfferRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `label` unless the label is already populated.
    /// Returns whether the value was stored.
    pub fn set_if_absent(&mut self, label: RuleLabel, value: impl Into<String>) -> bool {
        self.insert_if_absent(label.as_str(), value)
    }

    /// Same as [`set_if_absent`](Self::set_if_absent) for free-form labels,
    /// used for rules coming back from the remote service.
    pub fn insert_if_absent(&mut self, label: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        let value = value.trim();
        if value.is_empty() || self.0.contains_key(label) {
            return false;
        }
        self.0.insert(label.to_string(), value.to_string());
        true
    }

    pub fn get(&self, label: RuleLabel) -> Option<&str> {
        self.0.get(label.as_str()).map(String::as_str)
    }

    pub fn get_raw(&self, label: &str) -> Option<&str> {
        self.0.get(label).map(String::as_str)
    }

    pub fn contains(&self, label: RuleLabel) -> bool {
        self.0.contains_key(label.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for OfferRules {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut rules = OfferRules::new();
        for (label, value) in iter {
            rules.insert_if_absent(label, value);
        }
        rules
    }
}

/// Structured offer record produced by an extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfferData {
    pub offer_name: String,
    pub offer_headline: String,
    pub offer_bodyline: String,
    pub offer_description: String,
    /// ISO `YYYY-MM-DD` or empty.
    pub offer_start_date: String,
    /// ISO `YYYY-MM-DD` or empty. Never set without a start date.
    pub offer_end_date: String,
    #[serde(with = "earn_type_field")]
    pub earn_type: Option<EarnType>,
    pub earn_amount: String,
    pub earn_display_text: String,
    pub simple_point_expiry: String,
    pub offer_rules: OfferRules,
}

impl OfferData {
    /// Serialize for clipboard/file export. With `elide_empty`, empty strings
    /// and an empty rules map are left out.
    pub fn to_export_json(&self, elide_empty: bool) -> Result<String> {
        let mut value = serde_json::to_value(self)?;
        if elide_empty {
            if let serde_json::Value::Object(map) = &mut value {
                map.retain(|_, v| match v {
                    serde_json::Value::String(s) => !s.is_empty(),
                    serde_json::Value::Object(o) => !o.is_empty(),
                    _ => true,
                });
            }
        }
        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Download filename: `<offerName>-data.json`, or `offer-data.json`.
    pub fn export_filename(&self) -> String {
        let stem: String = self
            .offer_name
            .trim()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || matches!(c, '-' | '_' | '\'' | ' ') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let stem = stem.trim();
        if stem.is_empty() {
            "offer-data.json".to_string()
        } else {
            format!("{}-data.json", stem)
        }
    }
}

/// `earnType` travels as a plain string; empty means unset.
mod earn_type_field {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::EarnType;

    pub fn serialize<S: Serializer>(value: &Option<EarnType>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.map(|t| t.as_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<EarnType>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.as_deref().and_then(EarnType::parse))
    }
}
