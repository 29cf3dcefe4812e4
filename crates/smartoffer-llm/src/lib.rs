//! Hosted LLM offer extraction (OpenAI/Anthropic/Groq).
//!
//! Remote calls are bounded by a timeout and always backed by the local
//! regex extractor, so a caller never sees a remote failure as a hard error.

pub mod config;
pub mod fallback;
pub mod providers;
pub mod remote;
pub mod types;

pub use config::LLMConfig;
pub use fallback::extract_with_fallback;
pub use remote::extract_remote;
pub use types::*;
