//! AI completion client.
//!
//! Supports OpenAI-compatible chat completions (OpenAI, DeepSeek), Gemini
//! `generateContent` and Ollama `/api/generate`. `complete` returns the raw
//! response body; unwrapping the provider envelope is left to the caller.

use crate::models::config::{AiConfig, AiProvider};
use crate::services::AiService;
use crate::{Error, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use std::time::Duration;

const SYSTEM_PROMPT: &str = "Reply with the raw result only, no explanation.";

/// Chat message for OpenAI-compatible APIs.
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completion request payload.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
}

/// Gemini generateContent request payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

/// Options for Ollama generation.
#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    /// Fixed seed so the same listing yields the same answer.
    seed: u32,
}

/// Ollama generate request payload.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
    options: GenerateOptions,
}

/// AI provider client.
pub struct AiClient {
    provider: AiProvider,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl AiClient {
    /// Create a client from configuration.
    pub fn new(config: &AiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            provider: config.provider,
            api_key: config.api_key.trim().to_string(),
            base_url: config.effective_base_url(),
            model: config.effective_model(),
            temperature: config.temperature,
            client,
        })
    }

    pub fn provider(&self) -> AiProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check that the provider answers with the configured credentials.
    pub async fn health_check(&self) -> Result<bool> {
        let request = match self.provider {
            AiProvider::OpenAi | AiProvider::DeepSeek => self
                .client
                .get(format!("{}/models", self.base_url))
                .bearer_auth(&self.api_key),
            AiProvider::Gemini => self.client.get(format!(
                "{}/v1beta/models?key={}",
                self.base_url, self.api_key
            )),
            AiProvider::Ollama => self.client.get(format!("{}/api/tags", self.base_url)),
        };

        match request.send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Send `prompt` and return the raw response body.
    pub async fn request(&self, prompt: &str) -> Result<String> {
        let request = match self.provider {
            AiProvider::OpenAi | AiProvider::DeepSeek => self
                .client
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&ChatRequest {
                    model: &self.model,
                    temperature: self.temperature,
                    messages: vec![
                        ChatMessage {
                            role: "system",
                            content: SYSTEM_PROMPT,
                        },
                        ChatMessage {
                            role: "user",
                            content: prompt,
                        },
                    ],
                }),
            AiProvider::Gemini => self
                .client
                .post(format!(
                    "{}/v1beta/models/{}:generateContent?key={}",
                    self.base_url, self.model, self.api_key
                ))
                .json(&GeminiRequest {
                    contents: vec![GeminiContent {
                        role: "user",
                        parts: vec![GeminiPart { text: prompt }],
                    }],
                    generation_config: GeminiGenerationConfig {
                        temperature: self.temperature,
                    },
                }),
            AiProvider::Ollama => self
                .client
                .post(format!("{}/api/generate", self.base_url))
                .json(&GenerateRequest {
                    model: &self.model,
                    prompt,
                    stream: false,
                    format: "json",
                    options: GenerateOptions {
                        temperature: self.temperature,
                        seed: 42,
                    },
                }),
        };

        tracing::debug!("AI request to {} ({})", self.provider, self.model);
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::AiRequest(format!(
                "{} returned {}: {}",
                self.provider, status, body
            )));
        }
        Ok(body)
    }
}

impl AiService for AiClient {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        self.request(prompt).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_uses_provider_defaults() {
        let client = AiClient::new(&AiConfig {
            enabled: true,
            provider: AiProvider::DeepSeek,
            api_key: "k".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.model(), "deepseek-chat");
        assert_eq!(client.base_url, "https://api.deepseek.com/v1");
    }

    #[test]
    fn test_gemini_payload_shape() {
        let payload = serde_json::to_value(GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: "hi" }],
            }],
            generation_config: GeminiGenerationConfig { temperature: 0.5 },
        })
        .unwrap();
        assert_eq!(payload["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(payload["generationConfig"]["temperature"], 0.5);
    }
}
