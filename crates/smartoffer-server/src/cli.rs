//! One-shot CLI commands.

use smartoffer_extract::{ExtractionEnvelope, OfferExtractor};

/// `smartoffer extract <text...>`: the extraction envelope as pretty JSON.
pub fn extract_command(extractor: &OfferExtractor, text: &str) -> anyhow::Result<String> {
    let envelope = ExtractionEnvelope::from(extractor.extract(text));
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// `smartoffer export <text...>`: the export JSON with empty fields left out.
pub fn export_command(extractor: &OfferExtractor, text: &str) -> anyhow::Result<String> {
    let offer = extractor.extract(text)?;
    Ok(offer.to_export_json(true)?)
}

pub fn print_help() {
    println!("Smart Offer: offer text extraction server");
    println!();
    println!("Usage: smartoffer [command]");
    println!();
    println!("Commands:");
    println!("  (none)               Start the server");
    println!("  extract <text...>    Extract offer fields and print the result JSON");
    println!("  export <text...>     Extract and print the export JSON (empty fields omitted)");
    println!("  help                 Show this help message");
}
