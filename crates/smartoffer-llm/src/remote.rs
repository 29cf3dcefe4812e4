//! Remote extraction: prompt, response cleaning and validation.
//!
//! The model's reply is untrusted. Anything that does not parse to a JSON
//! object is a `MalformedResponse`; fields that parse but have the wrong
//! shape are coerced or dropped rather than rejected.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde_json::{Map, Value};
use smartoffer_core::{EarnType, Error, OfferData, OfferRules, Result};
use tracing::{debug, warn};

use crate::providers::{complete, CompletionParams};
use crate::types::ResolvedProvider;

const SYSTEM_PROMPT: &str =
    "You extract structured loyalty offer data from marketing text and reply with JSON only.";

static FENCE_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```[a-zA-Z]*\s*").unwrap());
static FENCE_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*```\s*$").unwrap());

/// Instruction sent to the model for `text`.
pub fn build_prompt(text: &str) -> String {
    format!(
        r#"Extract offer details from the following text and return ONLY a valid JSON object with these exact fields:

{{
  "offerName": "brand or product name",
  "offerHeadline": "catchy marketing headline (generate if not present)",
  "offerBodyline": "engaging description (generate if not present)",
  "earnAmount": "numeric value only",
  "earnType": "points, cashback, percentage, or fixed",
  "earnDisplayText": "how reward is displayed to user",
  "offerStartDate": "YYYY-MM-DD format",
  "offerEndDate": "YYYY-MM-DD format",
  "simplePointExpiry": "expiry description",
  "offerRules": {{
    "rule_name": "rule_value"
  }}
}}

Text to extract from:
{text}

Return ONLY the JSON object, no other text or formatting."#
    )
}

/// Strip surrounding markdown code fences.
pub fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let start = FENCE_OPEN_RE.find(trimmed).map(|m| m.end()).unwrap_or(0);
    let body = &trimmed[start..];
    let end = FENCE_CLOSE_RE
        .find(body)
        .map(|m| m.start())
        .unwrap_or(body.len());
    body[..end].trim()
}

/// Parse the model reply into a JSON object, falling back to the first
/// `{ ... }` span when the reply carries extra prose.
pub fn parse_response(raw: &str) -> Result<Map<String, Value>> {
    let cleaned = strip_fences(raw);

    let value = match serde_json::from_str::<Value>(cleaned) {
        Ok(v) => v,
        Err(e) => {
            debug!("Direct JSON parse failed: {}", e);
            let span = match (cleaned.find('{'), cleaned.rfind('}')) {
                (Some(start), Some(end)) if end > start => &cleaned[start..=end],
                _ => {
                    return Err(Error::MalformedResponse(
                        "No JSON found in model response".into(),
                    ))
                }
            };
            serde_json::from_str::<Value>(span).map_err(|_| {
                Error::MalformedResponse("Could not parse model response as JSON".into())
            })?
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::MalformedResponse(
            "Model response is not a JSON object".into(),
        )),
    }
}

fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// A real calendar date in `YYYY-MM-DD`, otherwise empty.
fn coerce_date(value: Option<&Value>) -> String {
    let s = coerce_string(value);
    match NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => {
            if !s.is_empty() {
                debug!("Ignoring invalid date from model: {}", s);
            }
            String::new()
        }
    }
}

fn coerce_rules(value: Option<&Value>) -> OfferRules {
    let mut rules = OfferRules::new();
    if let Some(Value::Object(map)) = value {
        for (label, v) in map {
            let text = match v {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            rules.insert_if_absent(label, text);
        }
    }
    rules
}

/// Validate a parsed reply into `OfferData`. `offerDescription` is always the
/// trimmed input, and an end date without a start date is dropped.
pub fn offer_from_value(map: &Map<String, Value>, input: &str) -> OfferData {
    let earn_type_raw = coerce_string(map.get("earnType"));
    let earn_type = EarnType::parse(&earn_type_raw);
    if earn_type.is_none() && !earn_type_raw.is_empty() {
        debug!("Ignoring unknown earnType from model: {}", earn_type_raw);
    }

    let rules_value = map.get("offerRules").or_else(|| map.get("rules"));

    let mut offer = OfferData {
        offer_name: coerce_string(map.get("offerName")),
        offer_headline: coerce_string(map.get("offerHeadline")),
        offer_bodyline: coerce_string(map.get("offerBodyline")),
        offer_description: input.trim().to_string(),
        offer_start_date: coerce_date(map.get("offerStartDate")),
        offer_end_date: coerce_date(map.get("offerEndDate")),
        earn_type,
        earn_amount: coerce_string(map.get("earnAmount")),
        earn_display_text: coerce_string(map.get("earnDisplayText")),
        simple_point_expiry: coerce_string(map.get("simplePointExpiry")),
        offer_rules: coerce_rules(rules_value),
    };

    if offer.offer_start_date.is_empty() && !offer.offer_end_date.is_empty() {
        warn!("Model returned an end date without a start date; dropping it");
        offer.offer_end_date.clear();
    }
    offer
}

/// Ask the resolved provider to extract `text` and validate the reply.
pub async fn extract_remote(
    client: &Client,
    resolved: &ResolvedProvider,
    text: &str,
) -> Result<OfferData> {
    let prompt = build_prompt(text);
    let reply = complete(
        client,
        resolved,
        SYSTEM_PROMPT,
        &prompt,
        CompletionParams::default(),
    )
    .await?;
    debug!("Model reply: {} chars", reply.len());

    let map = parse_response(&reply)?;
    Ok(offer_from_value(&map, text))
}
