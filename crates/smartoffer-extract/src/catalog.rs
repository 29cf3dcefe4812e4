//! Brand catalog: known brand tokens, category suffixes and marketing copy.
//!
//! Built-in defaults cover the demo brands. A JSON file (`data/brands.json`)
//! can add brands or replace entries by name, and override copy lines by key.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const GENERIC_COPY: &str = "generic";

/// A category suffix appended to the brand name when `keyword` appears in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySuffix {
    pub keyword: String,
    pub suffix: String,
}

/// A known brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandEntry {
    /// Display name, e.g. `Levi's`.
    pub name: String,
    /// Lowercase tokens that identify the brand as whole words.
    pub tokens: Vec<String>,
    #[serde(default)]
    pub category: Option<CategorySuffix>,
    /// Key into [`BrandCatalog::copy`].
    #[serde(default)]
    pub copy: Option<String>,
}

/// Headline + bodyline pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyLine {
    pub headline: String,
    pub bodyline: String,
}

/// Copy chosen by keyword when no brand-specific copy applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyKeywords {
    pub copy: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandCatalog {
    #[serde(default)]
    pub brands: Vec<BrandEntry>,
    #[serde(default)]
    pub copy: BTreeMap<String, CopyLine>,
    #[serde(default)]
    pub copy_keywords: Vec<CopyKeywords>,
}

fn brand(
    name: &str,
    tokens: &[&str],
    category: Option<(&str, &str)>,
    copy: Option<&str>,
) -> BrandEntry {
    BrandEntry {
        name: name.to_string(),
        tokens: tokens.iter().map(|t| t.to_string()).collect(),
        category: category.map(|(keyword, suffix)| CategorySuffix {
            keyword: keyword.to_string(),
            suffix: suffix.to_string(),
        }),
        copy: copy.map(str::to_string),
    }
}

fn line(headline: &str, bodyline: &str) -> CopyLine {
    CopyLine {
        headline: headline.to_string(),
        bodyline: bodyline.to_string(),
    }
}

impl Default for BrandCatalog {
    fn default() -> Self {
        let brands = vec![
            brand("Kenmore", &["kenmore"], Some(("appliance", "Appliances")), Some("appliance")),
            brand(
                "Levi's",
                &["levi's", "levis", "levi\u{2019}s"],
                Some(("jeans", "Jeans")),
                Some("denim"),
            ),
            brand("Nike", &["nike"], Some(("shoes", "Shoes")), Some("fashion")),
            brand("Samsung", &["samsung"], Some(("electronics", "Electronics")), Some("tech")),
            brand("Apple", &["apple"], Some(("electronics", "Electronics")), Some("tech")),
            brand("Walmart", &["walmart"], None, None),
            brand("Target", &["target"], None, None),
        ];

        let mut copy = BTreeMap::new();
        copy.insert(
            "appliance".to_string(),
            line("Appliance Deal!", "Save on Kenmore appliances and earn rewards!"),
        );
        copy.insert(
            "denim".to_string(),
            line("Denim Savings!", "Get premium Levi's jeans and earn points!"),
        );
        copy.insert(
            "tech".to_string(),
            line("Tech Rewards!", "Upgrade your electronics and earn points!"),
        );
        copy.insert(
            "fashion".to_string(),
            line("Style Rewards!", "Refresh your wardrobe and earn rewards!"),
        );
        copy.insert(
            GENERIC_COPY.to_string(),
            line("Special Offer!", "Save big and earn rewards!"),
        );

        let copy_keywords = vec![
            CopyKeywords {
                copy: "tech".to_string(),
                keywords: ["electronics", "tech", "laptop", "phone", "gadget"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
            CopyKeywords {
                copy: "fashion".to_string(),
                keywords: ["fashion", "clothing", "apparel", "jeans", "denim"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
        ];

        Self {
            brands,
            copy,
            copy_keywords,
        }
    }
}

impl BrandCatalog {
    /// Load the catalog override from `path` and merge it over the defaults.
    /// A missing or unreadable file yields the defaults.
    pub fn load(path: &Path) -> Self {
        let mut catalog = Self::default();
        let Ok(data) = std::fs::read_to_string(path) else {
            return catalog;
        };
        match serde_json::from_str::<BrandCatalog>(&data) {
            Ok(overrides) => {
                info!(
                    "Loaded brand catalog override from {} ({} brands)",
                    path.display(),
                    overrides.brands.len()
                );
                catalog.merge(overrides);
            }
            Err(e) => warn!("Ignoring invalid brand catalog {}: {}", path.display(), e),
        }
        catalog
    }

    /// Merge `other` into `self`. Brands with the same name (case-insensitive)
    /// are replaced in place; new brands are appended. Copy lines and keyword
    /// rules with the same key are replaced.
    pub fn merge(&mut self, other: BrandCatalog) {
        for entry in other.brands {
            match self
                .brands
                .iter_mut()
                .find(|b| b.name.eq_ignore_ascii_case(&entry.name))
            {
                Some(existing) => *existing = entry,
                None => self.brands.push(entry),
            }
        }
        self.copy.extend(other.copy);
        for rule in other.copy_keywords {
            match self.copy_keywords.iter_mut().find(|r| r.copy == rule.copy) {
                Some(existing) => *existing = rule,
                None => self.copy_keywords.push(rule),
            }
        }
    }

    /// First catalog brand (in catalog order) whose token appears as a whole
    /// word in `text_lower`.
    pub fn find_brand(&self, text_lower: &str) -> Option<&BrandEntry> {
        self.brands.iter().find(|b| {
            b.tokens
                .iter()
                .any(|t| contains_word(text_lower, &t.to_lowercase()))
        })
    }

    /// Copy line for `key`, falling back to the generic line.
    pub fn copy_for(&self, key: &str) -> CopyLine {
        self.copy
            .get(key)
            .or_else(|| self.copy.get(GENERIC_COPY))
            .cloned()
            .unwrap_or_else(|| line("Special Offer!", "Save big and earn rewards!"))
    }
}

/// Whole-word containment on already-lowercased text.
pub(crate) fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, m)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + m.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
