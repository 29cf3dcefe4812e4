//! Remote-first extraction with local regex fallback.

use std::time::{Duration, Instant};

use reqwest::Client;
use smartoffer_core::Error;
use smartoffer_extract::{ExtractionError, OfferExtractor};
use tracing::{info, warn};

use crate::remote::extract_remote;
use crate::types::{ExtractionMethod, ExtractionSource, ResolvedProvider, TaggedExtraction};

/// Extract `text`, preferring the hosted model when `method` is `Remote`.
///
/// Any remote failure (no provider, timeout, HTTP error, malformed reply) is
/// logged and answered by the local extractor. Only a fault inside the local
/// extractor itself is returned as an error.
pub async fn extract_with_fallback(
    client: &Client,
    provider: Option<&ResolvedProvider>,
    extractor: &OfferExtractor,
    text: &str,
    method: ExtractionMethod,
    timeout: Duration,
) -> Result<TaggedExtraction, ExtractionError> {
    let started = Instant::now();

    if method == ExtractionMethod::Regex {
        let data = extractor.extract(text)?;
        return Ok(TaggedExtraction {
            method: ExtractionSource::Regex,
            provider: None,
            processing_time_ms: elapsed_ms(started),
            data,
            remote_error: None,
        });
    }

    let remote_error = match provider {
        None => "No LLM provider configured".to_string(),
        Some(resolved) => {
            match tokio::time::timeout(timeout, extract_remote(client, resolved, text)).await {
                Ok(Ok(data)) => {
                    info!(
                        "Remote extraction via {} succeeded in {}ms",
                        resolved.provider,
                        elapsed_ms(started)
                    );
                    return Ok(TaggedExtraction {
                        method: ExtractionSource::Remote,
                        provider: Some(resolved.provider.to_string()),
                        processing_time_ms: elapsed_ms(started),
                        data,
                        remote_error: None,
                    });
                }
                Ok(Err(e)) => e.to_string(),
                Err(_) => Error::Timeout(timeout.as_millis() as u64).to_string(),
            }
        }
    };

    warn!("Remote extraction failed, using regex fallback: {}", remote_error);
    let data = extractor.extract(text)?;
    Ok(TaggedExtraction {
        method: ExtractionSource::RegexFallback,
        provider: None,
        processing_time_ms: elapsed_ms(started),
        data,
        remote_error: Some(remote_error),
    })
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
