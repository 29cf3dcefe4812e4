//! LLM configuration persistence and provider selection.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{LLMConfigResponse, LLMConfigUpdate, LLMProvider, ResolvedProvider};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub const OPENAI_MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini", "gpt-4-turbo"];
pub const ANTHROPIC_MODELS: &[&str] = &[
    "claude-3-5-haiku-20241022",
    "claude-3-5-sonnet-20241022",
    "claude-sonnet-4-20250514",
];
pub const GROQ_MODELS: &[&str] = &["llama-3.3-70b-versatile", "llama-3.1-8b-instant"];

/// Stored LLM configuration (persisted to llm-config.json).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    /// Endpoint overrides for gateways and tests.
    #[serde(default)]
    pub openai_base_url: Option<String>,
    #[serde(default)]
    pub anthropic_base_url: Option<String>,
    #[serde(default)]
    pub groq_base_url: Option<String>,
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: default_preferred(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            openai_model: default_openai_model(),
            anthropic_model: default_anthropic_model(),
            groq_model: default_groq_model(),
            openai_base_url: None,
            anthropic_base_url: None,
            groq_base_url: None,
            config_path: PathBuf::new(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl LLMConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: LLMConfig = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        config.config_path = config_path.to_path_buf();

        if non_empty(config.openai_api_key.clone()).is_none() {
            config.openai_api_key = non_empty(std::env::var("OPENAI_API_KEY").ok());
        }
        if non_empty(config.anthropic_api_key.clone()).is_none() {
            config.anthropic_api_key = non_empty(std::env::var("ANTHROPIC_API_KEY").ok());
        }
        if non_empty(config.groq_api_key.clone()).is_none() {
            config.groq_api_key = non_empty(std::env::var("GROQ_API_KEY").ok());
        }

        config
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved LLM config to {}", self.config_path.display());
        Ok(())
    }

    /// Apply an update, merging with existing config. Empty keys clear a provider.
    pub fn apply_update(&mut self, update: &LLMConfigUpdate) {
        if let Some(p) = &update.preferred_provider {
            self.preferred_provider = p.trim().to_ascii_lowercase();
        }
        if let Some(k) = &update.openai_api_key {
            self.openai_api_key = non_empty(Some(k.clone()));
        }
        if let Some(k) = &update.anthropic_api_key {
            self.anthropic_api_key = non_empty(Some(k.clone()));
        }
        if let Some(k) = &update.groq_api_key {
            self.groq_api_key = non_empty(Some(k.clone()));
        }
        if let Some(m) = &update.openai_model {
            self.openai_model = m.clone();
        }
        if let Some(m) = &update.anthropic_model {
            self.anthropic_model = m.clone();
        }
        if let Some(m) = &update.groq_model {
            self.groq_model = m.clone();
        }
    }

    fn provider_settings(&self, provider: LLMProvider) -> Option<ResolvedProvider> {
        let (key, model, base_url, default_base) = match provider {
            LLMProvider::OpenAI => (
                &self.openai_api_key,
                &self.openai_model,
                &self.openai_base_url,
                OPENAI_BASE_URL,
            ),
            LLMProvider::Anthropic => (
                &self.anthropic_api_key,
                &self.anthropic_model,
                &self.anthropic_base_url,
                ANTHROPIC_BASE_URL,
            ),
            LLMProvider::Groq => (
                &self.groq_api_key,
                &self.groq_model,
                &self.groq_base_url,
                GROQ_BASE_URL,
            ),
        };
        let api_key = non_empty(key.clone())?;
        Some(ResolvedProvider {
            provider,
            model: model.clone(),
            api_key,
            base_url: base_url
                .as_deref()
                .unwrap_or(default_base)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// Resolve which provider to call. `auto` prefers OpenAI, then Anthropic, then Groq.
    pub fn resolve_provider(&self) -> Option<ResolvedProvider> {
        if self.preferred_provider != "auto" {
            return LLMProvider::parse(&self.preferred_provider)
                .and_then(|p| self.provider_settings(p));
        }

        [LLMProvider::OpenAI, LLMProvider::Anthropic, LLMProvider::Groq]
            .into_iter()
            .find_map(|p| self.provider_settings(p))
    }

    /// Endpoint root for `provider`, honouring overrides.
    pub fn base_url(&self, provider: LLMProvider) -> String {
        let (custom, default_base) = match provider {
            LLMProvider::OpenAI => (&self.openai_base_url, OPENAI_BASE_URL),
            LLMProvider::Anthropic => (&self.anthropic_base_url, ANTHROPIC_BASE_URL),
            LLMProvider::Groq => (&self.groq_base_url, GROQ_BASE_URL),
        };
        custom
            .as_deref()
            .unwrap_or(default_base)
            .trim_end_matches('/')
            .to_string()
    }

    /// Build the public config response (no API keys exposed).
    pub fn to_response(&self) -> LLMConfigResponse {
        LLMConfigResponse {
            preferred_provider: self.preferred_provider.clone(),
            openai_configured: self.openai_api_key.is_some(),
            anthropic_configured: self.anthropic_api_key.is_some(),
            groq_configured: self.groq_api_key.is_some(),
            openai_model: self.openai_model.clone(),
            anthropic_model: self.anthropic_model.clone(),
            groq_model: self.groq_model.clone(),
            active_provider: self.resolve_provider().map(|r| r.provider.to_string()),
        }
    }

    /// Models offered for the active provider.
    pub fn available_models(&self) -> Vec<String> {
        let models = match self.resolve_provider().map(|r| r.provider) {
            Some(LLMProvider::OpenAI) => OPENAI_MODELS,
            Some(LLMProvider::Anthropic) => ANTHROPIC_MODELS,
            Some(LLMProvider::Groq) => GROQ_MODELS,
            None => &[],
        };
        models.iter().map(|s| s.to_string()).collect()
    }
}
