//! Colour themes and theme detection.

use smartoffer_core::EarnType;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub text: &'static str,
    pub background: &'static str,
}

/// Glyph drawn in the middle of the thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Appliance,
    Jeans,
    Sneaker,
    Spark,
    Bullseye,
    Cart,
    Gadget,
    Lipstick,
    Car,
    Cup,
    Coin,
    Percent,
    Star,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub key: &'static str,
    pub name: &'static str,
    pub palette: Palette,
    pub icon: Icon,
}

const fn theme(
    key: &'static str,
    name: &'static str,
    colors: [&'static str; 5],
    icon: Icon,
) -> Theme {
    Theme {
        key,
        name,
        palette: Palette {
            primary: colors[0],
            secondary: colors[1],
            accent: colors[2],
            text: colors[3],
            background: colors[4],
        },
        icon,
    }
}

pub const KENMORE: Theme = theme(
    "kenmore",
    "Kenmore Appliances",
    ["#1e3a8a", "#3b82f6", "#60a5fa", "#ffffff", "#1e40af"],
    Icon::Appliance,
);
pub const LEVIS: Theme = theme(
    "levis",
    "Levi's Denim",
    ["#b91c1c", "#dc2626", "#f87171", "#ffffff", "#991b1b"],
    Icon::Jeans,
);
pub const NIKE: Theme = theme(
    "nike",
    "Nike",
    ["#000000", "#374151", "#f97316", "#ffffff", "#1f2937"],
    Icon::Sneaker,
);
pub const WALMART: Theme = theme(
    "walmart",
    "Walmart",
    ["#0071ce", "#004c91", "#ffc220", "#ffffff", "#004c91"],
    Icon::Spark,
);
pub const TARGET: Theme = theme(
    "target",
    "Target",
    ["#cc0000", "#ff6666", "#ffffff", "#ffffff", "#990000"],
    Icon::Bullseye,
);
pub const DENIM: Theme = theme(
    "denim",
    "Denim & Fashion",
    ["#1e40af", "#3b82f6", "#60a5fa", "#ffffff", "#1e3a8a"],
    Icon::Jeans,
);
pub const SHOES: Theme = theme(
    "shoes",
    "Footwear",
    ["#7c2d12", "#dc2626", "#f87171", "#ffffff", "#991b1b"],
    Icon::Sneaker,
);
pub const GROCERY: Theme = theme(
    "grocery",
    "Grocery & Supermarket",
    ["#16a34a", "#22c55e", "#4ade80", "#ffffff", "#15803d"],
    Icon::Cart,
);
pub const ELECTRONICS: Theme = theme(
    "electronics",
    "Electronics & Tech",
    ["#4338ca", "#6366f1", "#8b5cf6", "#ffffff", "#3730a3"],
    Icon::Gadget,
);
pub const BEAUTY: Theme = theme(
    "beauty",
    "Beauty & Cosmetics",
    ["#be185d", "#ec4899", "#f9a8d4", "#ffffff", "#9d174d"],
    Icon::Lipstick,
);
pub const AUTOMOTIVE: Theme = theme(
    "automotive",
    "Automotive",
    ["#374151", "#6b7280", "#9ca3af", "#ffffff", "#1f2937"],
    Icon::Car,
);
pub const COFFEE: Theme = theme(
    "coffee",
    "Coffee & Beverages",
    ["#92400e", "#d97706", "#fbbf24", "#ffffff", "#78350f"],
    Icon::Cup,
);
pub const CASHBACK: Theme = theme(
    "cashback",
    "Cashback & Finance",
    ["#059669", "#10b981", "#34d399", "#ffffff", "#047857"],
    Icon::Coin,
);
pub const PERCENTAGE: Theme = theme(
    "percentage",
    "Percentage Deals",
    ["#dc2626", "#ef4444", "#f87171", "#ffffff", "#b91c1c"],
    Icon::Percent,
);
pub const DEFAULT: Theme = theme(
    "default",
    "General Offers",
    ["#f97316", "#fb923c", "#fdba74", "#ffffff", "#ea580c"],
    Icon::Star,
);

pub const ALL_THEMES: &[Theme] = &[
    KENMORE,
    LEVIS,
    NIKE,
    WALMART,
    TARGET,
    DENIM,
    SHOES,
    GROCERY,
    ELECTRONICS,
    BEAUTY,
    AUTOMOTIVE,
    COFFEE,
    CASHBACK,
    PERCENTAGE,
    DEFAULT,
];

/// Brand themes matched by substring, in priority order.
const BRAND_THEMES: &[(&[&str], Theme)] = &[
    (&["kenmore"], KENMORE),
    (&["levis", "levi's"], LEVIS),
    (&["nike"], NIKE),
    (&["walmart"], WALMART),
    (&["target"], TARGET),
];

impl Theme {
    pub fn by_key(key: &str) -> Option<Theme> {
        let key = key.trim().to_ascii_lowercase();
        ALL_THEMES.iter().copied().find(|t| t.key == key)
    }
}

/// Pick a theme from the offer text and name, then the earn type.
pub fn detect_theme(offer_text: &str, offer_name: &str, earn_type: Option<EarnType>) -> Theme {
    let text = format!("{} {}", offer_text, offer_name).to_lowercase();

    if let Some((_, theme)) = BRAND_THEMES
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| text.contains(p)))
    {
        debug!("Theme from brand: {}", theme.name);
        return *theme;
    }

    if ["appliance", "washer", "dryer"].iter().any(|w| text.contains(w)) {
        debug!("Theme from appliance category");
        return KENMORE;
    }

    let theme = match earn_type {
        Some(EarnType::Cashback) => CASHBACK,
        Some(EarnType::Percentage) => PERCENTAGE,
        _ => DEFAULT,
    };
    debug!("Theme from earn type: {}", theme.name);
    theme
}
