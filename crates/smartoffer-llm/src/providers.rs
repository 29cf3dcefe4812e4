//! Hosted LLM completion calls.
//!
//! OpenAI and Groq share the chat-completions format. Anthropic uses the
//! Messages API. Calls are single-shot (no streaming); the caller bounds
//! them with its own timeout.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use smartoffer_core::{Error, Result};
use tracing::{debug, error};

use crate::types::{LLMProvider, ResolvedProvider};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Sampling settings for one completion.
#[derive(Debug, Clone, Copy)]
pub struct CompletionParams {
    pub temperature: f64,
    pub max_tokens: usize,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 1000,
        }
    }
}

/// Send `system` + `user` to the resolved provider and return the reply text.
pub async fn complete(
    client: &Client,
    resolved: &ResolvedProvider,
    system: &str,
    user: &str,
    params: CompletionParams,
) -> Result<String> {
    match resolved.provider {
        LLMProvider::OpenAI | LLMProvider::Groq => {
            complete_openai_compat(client, resolved, system, user, params).await
        }
        LLMProvider::Anthropic => complete_anthropic(client, resolved, system, user, params).await,
    }
}

async fn complete_openai_compat(
    client: &Client,
    resolved: &ResolvedProvider,
    system: &str,
    user: &str,
    params: CompletionParams,
) -> Result<String> {
    let url = format!("{}/chat/completions", resolved.base_url);
    let body = json!({
        "model": resolved.model,
        "messages": [
            {"role": "system", "content": system},
            {"role": "user", "content": user},
        ],
        "temperature": params.temperature,
        "max_tokens": params.max_tokens,
    });

    debug!("Completing via {} with model {}", url, resolved.model);

    let response = client
        .post(&url)
        .header("Authorization", format!("Bearer {}", resolved.api_key))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

    let parsed = read_json(response).await?;
    parsed["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::MalformedResponse("No content in completion response".into()))
}

async fn complete_anthropic(
    client: &Client,
    resolved: &ResolvedProvider,
    system: &str,
    user: &str,
    params: CompletionParams,
) -> Result<String> {
    let url = format!("{}/messages", resolved.base_url);
    let body = json!({
        "model": resolved.model,
        "system": system,
        "messages": [{"role": "user", "content": user}],
        "temperature": params.temperature,
        "max_tokens": params.max_tokens,
    });

    debug!("Completing via Anthropic with model {}", resolved.model);

    let response = client
        .post(&url)
        .header("x-api-key", &resolved.api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

    let parsed = read_json(response).await?;
    let text: String = parsed["content"]
        .as_array()
        .map(|blocks| {
            blocks
                .iter()
                .filter(|b| b["type"].as_str() == Some("text"))
                .filter_map(|b| b["text"].as_str())
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(Error::MalformedResponse(
            "No text content in Anthropic response".into(),
        ));
    }
    Ok(text)
}

async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!("Provider returned {}: {}", status, body);
        return Err(Error::Remote(format!("API error {}: {}", status, body)));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| Error::MalformedResponse(format!("Invalid response body: {}", e)))
}

/// Test an API key by making a minimal request against `base_url`.
pub async fn test_api_key(
    client: &Client,
    provider: LLMProvider,
    base_url: &str,
    api_key: &str,
    timeout: Duration,
) -> std::result::Result<(), String> {
    let request = match provider {
        LLMProvider::OpenAI | LLMProvider::Groq => client
            .get(format!("{}/models", base_url))
            .header("Authorization", format!("Bearer {}", api_key)),
        LLMProvider::Anthropic => client
            .post(format!("{}/messages", base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&json!({
                "model": crate::config::DEFAULT_ANTHROPIC_MODEL,
                "max_tokens": 1,
                "messages": [{"role": "user", "content": "Hi"}],
            })),
    };

    let resp = request
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = resp.status();
    // Anthropic answers 400 for a valid key with a quota or model problem.
    if status.is_success() || (provider == LLMProvider::Anthropic && status.as_u16() == 400) {
        Ok(())
    } else {
        Err(format!("API returned status {}", status))
    }
}
