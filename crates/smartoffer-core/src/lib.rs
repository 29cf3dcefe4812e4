//! Smart Offer Core: offer data model, configuration, errors.

pub mod config;
pub mod error;
pub mod offer;

pub use config::{DataPaths, SmartOfferConfig};
pub use error::{Error, Result};
pub use offer::{EarnType, OfferData, OfferRules, RuleLabel};
