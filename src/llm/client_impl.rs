use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::client::LlmClient;
use crate::pipeline::RequestPayload;
use crate::util::SecretString;

fn build_http_client(timeout_secs: Option<u64>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("failed to build HTTP client")
}

// ============================================================================
// Anthropic Client
// ============================================================================

pub struct AnthropicClient {
    api_key: SecretString,
    model: String,
    base_url: String,
    max_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    text: String,
}

impl AnthropicClient {
    pub fn new(
        api_key: String,
        model: String,
        max_tokens: u32,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        Self::with_base_url(
            api_key,
            model,
            "https://api.anthropic.com".to_string(),
            max_tokens,
            timeout_secs,
        )
    }

    pub fn with_base_url(
        api_key: String,
        model: String,
        base_url: String,
        max_tokens: u32,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            model,
            base_url,
            max_tokens,
            client: build_http_client(timeout_secs)?,
        })
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, payload: &RequestPayload) -> Result<String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: payload.system().to_string(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: payload.user().to_string(),
            }],
        };

        debug!("Calling Anthropic API with model: {}", self.model);

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!("Anthropic API error {}: {}", status, error_text);
        }

        let api_response: AnthropicResponse = response
            .json()
            .await
            .context("Failed to parse Anthropic API response")?;

        api_response
            .content
            .first()
            .map(|c| c.text.clone())
            .context("No content in Anthropic response")
    }
}

// ============================================================================
// OpenAI Client
// ============================================================================

pub struct OpenAIClient {
    api_key: SecretString,
    model: String,
    base_url: String,
    max_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

impl OpenAIClient {
    pub fn new(
        api_key: String,
        model: String,
        max_tokens: u32,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        Self::with_base_url(
            api_key,
            model,
            "https://api.openai.com/v1".to_string(),
            max_tokens,
            timeout_secs,
        )
    }

    pub fn with_base_url(
        api_key: String,
        model: String,
        base_url: String,
        max_tokens: u32,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_tokens,
            client: build_http_client(timeout_secs)?,
        })
    }

    fn build_request(&self, payload: &RequestPayload) -> OpenAIRequest {
        // GPT-5+ models use max_completion_tokens instead of max_tokens
        let (max_tokens, max_completion_tokens) = if self.model.starts_with("gpt-5") {
            (None, Some(self.max_tokens))
        } else {
            (Some(self.max_tokens), None)
        };

        OpenAIRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: payload.system().to_string(),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: payload.user().to_string(),
                },
            ],
            temperature: 0.7,
            max_tokens,
            max_completion_tokens,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, payload: &RequestPayload) -> Result<String> {
        let request = self.build_request(payload);

        debug!(
            "Calling OpenAI-compatible API at {} with model: {}",
            self.base_url, self.model
        );

        let url = format!("{}/chat/completions", self.base_url);

        let mut req = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&request);

        // Only add authorization if API key is not empty
        if !self.api_key.expose().is_empty() && self.api_key.expose().to_lowercase() != "none" {
            req = req.header("authorization", format!("Bearer {}", self.api_key.expose()));
        }

        let response = req
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!("OpenAI API error {}: {}", status, error_text);
        }

        let api_response: OpenAIResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI API response")?;

        api_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .context("No choices in OpenAI response")
    }
}

// ============================================================================
// Gemini Client (Google Generative AI)
// ============================================================================

pub struct GeminiClient {
    api_key: SecretString,
    model: String,
    base_url: String,
    max_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: String,
        max_tokens: u32,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        Self::with_base_url(
            api_key,
            model,
            "https://generativelanguage.googleapis.com".to_string(),
            max_tokens,
            timeout_secs,
        )
    }

    pub fn with_base_url(
        api_key: String,
        model: String,
        base_url: String,
        max_tokens: u32,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            model,
            base_url,
            max_tokens,
            client: build_http_client(timeout_secs)?,
        })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, payload: &RequestPayload) -> Result<String> {
        let request = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: payload.system().to_string(),
                }],
            },
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: payload.user().to_string(),
                }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                max_output_tokens: self.max_tokens,
            }),
        };

        debug!("Calling Gemini API with model: {}", self.model);

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose())
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!("Gemini API error {}: {}", status, error_text);
        }

        let api_response: GeminiResponse = response
            .json()
            .await
            .context("Failed to parse Gemini API response")?;

        api_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .context("No content in Gemini response")
    }
}

// ============================================================================
// Tests
// ============================================================================
