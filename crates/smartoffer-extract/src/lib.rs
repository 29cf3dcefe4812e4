//! Smart Offer Extract: regex extraction of structured offer data from free text.
//!
//! Single-pass and stateless: every call allocates its own output, so one
//! extractor can be shared across threads and requests without locking.

pub mod catalog;
pub mod extract;

pub use catalog::{BrandCatalog, BrandEntry, CopyLine};
pub use extract::{extract, ExtractOptions, ExtractionEnvelope, ExtractionError, OfferExtractor};
