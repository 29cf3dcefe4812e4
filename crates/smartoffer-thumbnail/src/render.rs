//! SVG thumbnail rendering.
//!
//! Everything is drawn on a 120×120 canvas; the requested width/height only
//! change the outer `<svg>` size, and the viewBox scales the drawing.

use std::fmt::Write as _;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use smartoffer_core::{EarnType, Error, OfferData, OfferRules, Result};
use tracing::debug;

use crate::details::{mentions_laundry, ImageDetails};
use crate::theme::{detect_theme, Icon, Palette, Theme};

pub const DEFAULT_SIZE: u32 = 120;
pub const MIN_SIZE: u32 = 16;
pub const MAX_SIZE: u32 = 1024;

const CANVAS: f64 = 120.0;
const MAX_TEXT_CHARS: usize = 15;
const MAX_BRAND_CHARS: usize = 12;

fn default_size() -> u32 {
    DEFAULT_SIZE
}

/// Everything the renderer needs, in the shape the UI posts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailRequest {
    #[serde(default)]
    pub offer_name: String,
    #[serde(default)]
    pub earn_amount: String,
    #[serde(default)]
    pub earn_type: String,
    #[serde(default)]
    pub offer_headline: String,
    #[serde(default)]
    pub offer_bodyline: String,
    #[serde(default)]
    pub extracted_brand: String,
    #[serde(default)]
    pub extracted_products: Vec<String>,
    #[serde(default)]
    pub extracted_category: String,
    #[serde(default)]
    pub extracted_rules: OfferRules,
    /// Source text, used only for theme detection.
    #[serde(default)]
    pub offer_text: String,
    #[serde(default = "default_size")]
    pub width: u32,
    #[serde(default = "default_size")]
    pub height: u32,
    /// Explicit theme key; skips detection when it names a known theme.
    #[serde(default)]
    pub theme: Option<String>,
}

impl Default for ThumbnailRequest {
    fn default() -> Self {
        Self {
            offer_name: String::new(),
            earn_amount: String::new(),
            earn_type: String::new(),
            offer_headline: String::new(),
            offer_bodyline: String::new(),
            extracted_brand: String::new(),
            extracted_products: Vec::new(),
            extracted_category: String::new(),
            extracted_rules: OfferRules::new(),
            offer_text: String::new(),
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            theme: None,
        }
    }
}

impl ThumbnailRequest {
    /// Build a request from an extraction result and the text it came from.
    pub fn from_offer(offer: &OfferData, input_text: &str) -> Self {
        let details = ImageDetails::from_offer(offer, input_text);
        Self {
            offer_name: offer.offer_name.clone(),
            earn_amount: offer.earn_amount.clone(),
            earn_type: offer.earn_type.map(|t| t.as_str().to_string()).unwrap_or_default(),
            offer_headline: offer.offer_headline.clone(),
            offer_bodyline: offer.offer_bodyline.clone(),
            extracted_brand: details.extracted_brand,
            extracted_products: details.extracted_products,
            extracted_category: details.extracted_category,
            extracted_rules: details.extracted_rules,
            offer_text: input_text.to_string(),
            ..Default::default()
        }
    }

    pub fn earn_type(&self) -> Option<EarnType> {
        EarnType::parse(&self.earn_type)
    }

    /// The explicit theme if it is known, otherwise the detected one.
    pub fn resolve_theme(&self) -> Theme {
        self.theme
            .as_deref()
            .and_then(Theme::by_key)
            .unwrap_or_else(|| detect_theme(&self.offer_text, &self.offer_name, self.earn_type()))
    }

    fn has_laundry_product(&self) -> bool {
        mentions_laundry(&self.extracted_products)
    }
}

/// Badge for the reward: `"150 pts"`, `"25%"`, `"$5"`.
pub fn badge_text(earn_type: Option<EarnType>, amount: &str) -> Option<String> {
    let amount = amount.trim();
    if amount.is_empty() {
        return None;
    }
    match earn_type? {
        EarnType::Points => Some(format!("{} pts", amount)),
        EarnType::Percentage | EarnType::Cashback => Some(format!("{}%", amount)),
        EarnType::Fixed => Some(format!("${}", amount)),
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Uppercase and cut to `max` characters, ending in "..." when cut.
fn shorten(text: &str, max: usize) -> String {
    let upper = text.to_uppercase();
    if upper.chars().count() > max {
        let kept: String = upper.chars().take(max - 3).collect();
        format!("{}...", kept)
    } else {
        upper
    }
}

/// Render the thumbnail as a standalone SVG document.
pub fn render_svg(request: &ThumbnailRequest) -> Result<String> {
    for (label, value) in [("width", request.width), ("height", request.height)] {
        if !(MIN_SIZE..=MAX_SIZE).contains(&value) {
            return Err(Error::Render(format!(
                "{} must be between {} and {}, got {}",
                label, MIN_SIZE, MAX_SIZE, value
            )));
        }
    }

    let theme = request.resolve_theme();
    debug!("Rendering {}x{} thumbnail with theme {}", request.width, request.height, theme.name);
    let p = &theme.palette;

    let mut svg = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {c} {c}">"#,
        w = request.width,
        h = request.height,
        c = CANVAS
    );
    let _ = write!(
        svg,
        r#"<defs><linearGradient id="bg" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="{}"/><stop offset="0.6" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient></defs>"#,
        p.primary, p.secondary, p.background
    );
    let _ = write!(svg, r#"<rect width="{c}" height="{c}" fill="url(#bg)"/>"#, c = CANVAS);

    push_dots(&mut svg, p);
    push_corners(&mut svg, p);
    push_icon(&mut svg, theme.icon, p, request.has_laundry_product());
    push_text(&mut svg, request, p);

    svg.push_str("</svg>");
    Ok(svg)
}

/// Render and wrap as a `data:image/svg+xml;base64,` URI.
pub fn render(request: &ThumbnailRequest) -> Result<String> {
    let svg = render_svg(request)?;
    Ok(format!("data:image/svg+xml;base64,{}", BASE64.encode(svg.as_bytes())))
}

fn push_dots(svg: &mut String, p: &Palette) {
    let _ = write!(svg, r#"<g fill="{}" fill-opacity="0.125">"#, p.accent);
    for i in (0..120).step_by(20) {
        for j in (0..120).step_by(20) {
            if (i + j) % 40 == 0 {
                let _ = write!(svg, r#"<rect x="{}" y="{}" width="2" height="2"/>"#, i, j);
            }
        }
    }
    svg.push_str("</g>");
}

fn push_corners(svg: &mut String, p: &Palette) {
    let _ = write!(
        svg,
        r#"<g fill="{}" fill-opacity="0.376"><polygon points="0,0 20,0 0,20"/><polygon points="120,120 100,120 120,100"/></g>"#,
        p.accent
    );
}

fn push_icon(svg: &mut String, icon: Icon, p: &Palette, laundry: bool) {
    svg.push_str(r#"<g class="icon">"#);
    let _ = match icon {
        Icon::Appliance if laundry => write!(
            svg,
            r##"<rect x="40" y="30" width="40" height="34" rx="4" fill="{p}"/><rect x="45" y="32" width="30" height="5" fill="{s}"/><circle cx="60" cy="50" r="11" fill="{a}"/><circle cx="60" cy="50" r="7" fill="{b}"/>"##,
            p = p.primary,
            s = p.secondary,
            a = p.accent,
            b = p.background
        ),
        Icon::Appliance => write!(
            svg,
            r##"<rect x="44" y="22" width="32" height="48" rx="3" fill="{p}" stroke="{a}" stroke-width="1.5"/><line x1="44" y1="40" x2="76" y2="40" stroke="{a}" stroke-width="1.5"/><rect x="70" y="28" width="2" height="8" fill="#ffffff"/><rect x="70" y="46" width="2" height="12" fill="#ffffff"/>"##,
            p = p.primary,
            a = p.accent
        ),
        Icon::Jeans => write!(
            svg,
            r##"<rect x="35" y="25" width="50" height="8" rx="2" fill="#1e40af"/><rect x="40" y="33" width="16" height="40" rx="3" fill="#1e40af"/><rect x="64" y="33" width="16" height="40" rx="3" fill="#1e40af"/><rect x="42" y="45" width="8" height="4" fill="{p}"/><rect x="42" y="38" width="12" height="9" rx="2" fill="none" stroke="{a}" stroke-width="1.5"/>"##,
            p = p.primary,
            a = p.accent
        ),
        Icon::Sneaker => write!(
            svg,
            r##"<ellipse cx="60" cy="62" rx="30" ry="7" fill="{p}"/><ellipse cx="60" cy="48" rx="25" ry="14" fill="{s}"/><path d="M45 50 Q65 40 80 57 Q75 60 50 57 Z" fill="{a}"/>"##,
            p = p.primary,
            s = p.secondary,
            a = p.accent
        ),
        Icon::Spark => write!(
            svg,
            r##"<g stroke="{a}" stroke-width="5" stroke-linecap="round"><line x1="60" y1="25" x2="60" y2="40"/><line x1="60" y1="60" x2="60" y2="75"/><line x1="38" y1="37" x2="51" y2="45"/><line x1="69" y1="55" x2="82" y2="63"/><line x1="38" y1="63" x2="51" y2="55"/><line x1="69" y1="45" x2="82" y2="37"/></g>"##,
            a = p.accent
        ),
        Icon::Bullseye => write!(
            svg,
            r##"<circle cx="60" cy="50" r="24" fill="{a}"/><circle cx="60" cy="50" r="16" fill="{p}"/><circle cx="60" cy="50" r="8" fill="{a}"/>"##,
            a = p.accent,
            p = p.primary
        ),
        Icon::Cart => write!(
            svg,
            r##"<path d="M35 30 L45 30 L52 60 L80 60 L85 40 L48 40" fill="none" stroke="{a}" stroke-width="4" stroke-linejoin="round"/><circle cx="55" cy="68" r="4" fill="{a}"/><circle cx="77" cy="68" r="4" fill="{a}"/>"##,
            a = p.accent
        ),
        Icon::Gadget => write!(
            svg,
            r##"<rect x="46" y="22" width="28" height="50" rx="5" fill="{p}" stroke="{a}" stroke-width="2"/><rect x="50" y="28" width="20" height="34" fill="{s}"/><circle cx="60" cy="67" r="2" fill="{a}"/>"##,
            p = p.primary,
            s = p.secondary,
            a = p.accent
        ),
        Icon::Lipstick => write!(
            svg,
            r##"<rect x="52" y="48" width="16" height="26" rx="2" fill="{p}"/><rect x="54" y="36" width="12" height="12" fill="{a}"/><path d="M54 36 L54 26 L66 30 L66 36 Z" fill="{s}"/>"##,
            p = p.primary,
            a = p.accent,
            s = p.secondary
        ),
        Icon::Car => write!(
            svg,
            r##"<path d="M32 58 L36 44 Q38 38 46 38 L74 38 Q82 38 84 44 L88 58 Z" fill="{s}"/><rect x="30" y="56" width="60" height="10" rx="3" fill="{p}"/><circle cx="44" cy="68" r="6" fill="{a}"/><circle cx="76" cy="68" r="6" fill="{a}"/>"##,
            s = p.secondary,
            p = p.primary,
            a = p.accent
        ),
        Icon::Cup => write!(
            svg,
            r##"<path d="M42 36 L78 36 L74 70 L46 70 Z" fill="{p}"/><path d="M78 42 Q90 44 78 58" fill="none" stroke="{p}" stroke-width="4"/><path d="M52 30 Q55 24 52 18 M62 30 Q65 24 62 18" fill="none" stroke="{a}" stroke-width="2"/>"##,
            p = p.primary,
            a = p.accent
        ),
        Icon::Coin => write!(
            svg,
            r##"<circle cx="60" cy="48" r="22" fill="{a}" stroke="{p}" stroke-width="3"/><text x="60" y="56" font-family="Arial" font-weight="bold" font-size="24" text-anchor="middle" fill="{p}">$</text>"##,
            a = p.accent,
            p = p.primary
        ),
        Icon::Percent => write!(
            svg,
            r##"<circle cx="60" cy="48" r="22" fill="{a}"/><text x="60" y="57" font-family="Arial" font-weight="bold" font-size="26" text-anchor="middle" fill="{p}">%</text>"##,
            a = p.accent,
            p = p.primary
        ),
        Icon::Star => write!(
            svg,
            r##"<polygon points="60,24 67,42 86,42 71,53 76,71 60,60 44,71 49,53 34,42 53,42" fill="{a}" stroke="{p}" stroke-width="1.5"/>"##,
            a = p.accent,
            p = p.primary
        ),
    };
    svg.push_str("</g>");
}

fn push_text(svg: &mut String, request: &ThumbnailRequest, p: &Palette) {
    let headline = [request.offer_headline.trim(), request.offer_name.trim()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("SPECIAL OFFER");
    let brand = [request.extracted_brand.trim(), request.offer_name.trim()]
        .into_iter()
        .find(|s| !s.is_empty());

    let band_opacity = if brand.is_some() { 0.9 } else { 0.8 };
    let _ = write!(
        svg,
        r##"<rect x="0" y="85" width="120" height="35" fill="#000000" fill-opacity="{}"/>"##,
        band_opacity
    );

    if let Some(brand) = brand.filter(|b| *b != headline) {
        let _ = write!(
            svg,
            r#"<text x="60" y="95" font-family="Arial" font-weight="bold" font-size="8" text-anchor="middle" fill="{}">{}</text>"#,
            p.accent,
            escape_xml(&shorten(brand, MAX_BRAND_CHARS))
        );
    }

    let text_y = if brand.is_some() { 105 } else { 98 };
    let _ = write!(
        svg,
        r#"<text x="60" y="{}" font-family="Arial" font-weight="bold" font-size="11" text-anchor="middle" fill="{}">{}</text>"#,
        text_y,
        p.text,
        escape_xml(&shorten(headline, MAX_TEXT_CHARS))
    );

    if let Some(badge) = badge_text(request.earn_type(), &request.earn_amount) {
        let badge_y = if brand.is_some() { 115 } else { 111 };
        let _ = write!(
            svg,
            r#"<text class="badge" x="60" y="{}" font-family="Arial" font-weight="bold" font-size="10" text-anchor="middle" fill="{}">{}</text>"#,
            badge_y,
            p.accent,
            escape_xml(&badge)
        );
    }
}
