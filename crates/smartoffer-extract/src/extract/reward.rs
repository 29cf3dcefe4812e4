//! Reward amount/type as a strict priority cascade.
//!
//! Points-based rewards always win over a plain discount: "% off" is only
//! honoured when no points or cashback phrase appears anywhere in the text.
//! Percentage-based points are stored as points per dollar (N% → N×10) and
//! dollar-based points as total points ($D → D×1000).

use once_cell::sync::Lazy;
use regex::Regex;
use smartoffer_core::EarnType;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    pub earn_type: EarnType,
    pub amount: String,
    pub display_text: String,
}

static POINTS_PER_DOLLAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:points?|pts)\s+per\s+dollar").unwrap()
});
static PERCENT_BACK_IN_POINTS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*%\s*back\s+in\s+points?").unwrap()
});
// Dollar amount, optionally with thousands separators ("$1,000.50").
const DOLLARS: &str = r"\$\s*((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?)";

static DOLLARS_IN_POINTS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i){DOLLARS}\s+(?:back\s+)?in\s+points?")).unwrap()
});
static PERCENT_CASHBACK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*%\s*cash[\s-]?back").unwrap()
});
static PERCENT_OFF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*%\s*off\b").unwrap());
/// Any points/cashback phrase; its presence suppresses "% off".
static POINTS_MENTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)(?:points?|pts)\s+per\s+dollar|%\s*back|%\s*cash[\s-]?back|{DOLLARS}\s+(?:back\s+)?in\s+points?"
    ))
    .unwrap()
});

/// Run the cascade; the first matching rule wins.
pub fn extract_reward(text: &str) -> Option<Reward> {
    if let Some(n) = first_number(&POINTS_PER_DOLLAR_RE, text) {
        debug!("Reward: {} points per dollar", n);
        return Some(Reward {
            earn_type: EarnType::Points,
            amount: n.to_string(),
            display_text: format!("{} points per dollar", n),
        });
    }

    if let Some(n) = first_number(&PERCENT_BACK_IN_POINTS_RE, text) {
        debug!("Reward: {}% back in points", n);
        return Some(Reward {
            earn_type: EarnType::Points,
            amount: shift_decimal(n, 1),
            display_text: format!("{}% back in points", n),
        });
    }

    if let Some(d) = first_number(&DOLLARS_IN_POINTS_RE, text) {
        debug!("Reward: ${} in points", d);
        return Some(Reward {
            earn_type: EarnType::Points,
            amount: shift_decimal(&d.replace(',', ""), 3),
            display_text: format!("${} back in points", d),
        });
    }

    if let Some(n) = first_number(&PERCENT_CASHBACK_RE, text) {
        debug!("Reward: {}% cashback modelled as points", n);
        return Some(Reward {
            earn_type: EarnType::Points,
            amount: shift_decimal(n, 1),
            display_text: format!("{}% cashback", n),
        });
    }

    if POINTS_MENTION_RE.is_match(text) {
        debug!("Reward: points phrase present without a usable amount; ignoring discounts");
        return None;
    }

    first_number(&PERCENT_OFF_RE, text).map(|n| {
        debug!("Reward: {}% off", n);
        Reward {
            earn_type: EarnType::Percentage,
            amount: n.to_string(),
            display_text: format!("{}% off", n),
        }
    })
}

fn first_number<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Multiply a non-negative decimal string by 10^`places` exactly, without
/// going through floating point. Leading zeros and trailing fractional zeros
/// are dropped: `("1.25", 1)` → `"12.5"`, `("50", 3)` → `"50000"`.
pub(crate) fn shift_decimal(value: &str, places: usize) -> String {
    let (int_part, frac_part) = value.split_once('.').unwrap_or((value, ""));
    let point = int_part.len() + places;
    let mut digits = format!("{}{}", int_part, frac_part);
    while digits.len() < point {
        digits.push('0');
    }
    let (int_digits, frac_digits) = digits.split_at(point);
    let int_digits = int_digits.trim_start_matches('0');
    let int_digits = if int_digits.is_empty() { "0" } else { int_digits };
    let frac_digits = frac_digits.trim_end_matches('0');
    if frac_digits.is_empty() {
        int_digits.to_string()
    } else {
        format!("{}.{}", int_digits, frac_digits)
    }
}
