//! Point expiry window.

use once_cell::sync::Lazy;
use regex::Regex;

static EXPIRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:available\s+for|expire[sd]?\s+after)\s+(?:the\s+)?next\s+(\d+)\s+days?\b")
        .unwrap()
});

/// `"available for the next 30 days"` → `"Points expire 30 days after earning date"`.
pub fn extract_point_expiry(text: &str) -> Option<String> {
    EXPIRY_RE
        .captures(text)
        .and_then(|cap| cap.get(1))
        .map(|days| format!("Points expire {} days after earning date", days.as_str()))
}
