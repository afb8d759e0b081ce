//! Gemini `embedContent` provider.
//!
//! Sends `POST {base_url}/v1beta/{model}:embedContent` with the API key in the
//! `x-goog-api-key` header and reads `embedding.values` from the response.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::EmbeddingProvider;
use crate::config::EmbeddingConfig;
use crate::error::ProviderError;

/// Remote embedding provider backed by the Gemini API.
pub struct GeminiEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    content: Content<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Option<Values>,
}

#[derive(Deserialize)]
struct Values {
    values: Vec<f32>,
}

impl GeminiEmbeddingProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(ProviderError::MissingApiKey)?;

        let model = qualified_model(&config.model);
        let endpoint = format!(
            "{}/v1beta/{}:embedContent",
            config.base_url.trim_end_matches('/'),
            model
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ProviderError::Http)?;

        tracing::info!(model = %model, endpoint = %endpoint, "gemini embedding provider configured");

        Ok(Self {
            client,
            endpoint,
            model,
            api_key,
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let body = EmbedRequest {
            model: &self.model,
            content: Content {
                parts: [Part { text }],
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "gemini embedding request rejected");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: payload,
            });
        }

        parse_response(&payload)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

impl GeminiEmbeddingProvider {
    fn map_transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else {
            ProviderError::Http(err)
        }
    }
}

/// Model ids are addressed as `models/<name>`; accept the bare name too.
fn qualified_model(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

fn parse_response(payload: &str) -> Result<Vec<f32>, ProviderError> {
    let parsed: EmbedResponse =
        serde_json::from_str(payload).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    let values = parsed
        .embedding
        .ok_or_else(|| ProviderError::Malformed("missing `embedding` field".into()))?
        .values;
    if values.is_empty() {
        return Err(ProviderError::EmptyEmbedding);
    }
    Ok(values)
}
