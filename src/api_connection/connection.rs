use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;
use thiserror::Error;
use tracing::{debug, warn};

use super::endpoints::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, JsonSchemaDefinition, Provider,
    ResponseFormat,
};
use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
    #[error("API returned no usable content")]
    EmptyCompletion,
}

/// The generative content collaborator: a free-text prompt plus a JSON schema in,
/// JSON text out.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate_json(
        &self,
        prompt: &str,
        schema: &JsonSchemaDefinition,
    ) -> Result<String, ApiConnectionError>;
}

/// Removes a surrounding markdown code fence (```json ... ``` or ``` ... ```).
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    if !(trimmed.starts_with("```") && trimmed.ends_with("```")) || trimmed.len() < 6 {
        return trimmed;
    }
    let inner = trimmed.trim_start_matches("```").trim_end_matches("```");
    inner.strip_prefix("json").unwrap_or(inner).trim()
}

impl Provider {
    pub fn openrouter(config: &AppConfig) -> Self {
        Self::OpenRouter {
            api_key_env_var: config.api_key_env_var.clone(),
            model: config.model.clone(),
            url: config.api_url.clone(),
            site_url: config.site_url.clone(),
            app_name: config.app_name.clone(),
            provider_only: config.provider_only.clone(),
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Provider::OpenRouter { model, .. } => model,
        }
    }

    pub async fn call_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiConnectionError> {
        match self {
            Provider::OpenRouter {
                api_key_env_var,
                url,
                site_url,
                app_name,
                provider_only,
                ..
            } => {
                let api_key = env::var(api_key_env_var)
                    .map_err(|_| ApiConnectionError::MissingApiKey(api_key_env_var.clone()))?;

                let mut request_payload = serde_json::to_value(&request)?;
                if !provider_only.is_empty() {
                    if let Some(obj) = request_payload.as_object_mut() {
                        obj.insert("provider".to_string(), json!({ "only": provider_only }));
                    }
                }

                debug!(model = %request.model, url = %url, "sending chat completion request");
                let response = Client::new()
                    .post(url)
                    .bearer_auth(api_key)
                    .header("HTTP-Referer", site_url)
                    .header("X-Title", app_name)
                    .json(&request_payload)
                    .send()
                    .await?;

                if response.status().is_success() {
                    Ok(response.json::<ChatCompletionResponse>().await?)
                } else {
                    let status = response.status();
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    warn!(%status, "chat completion request rejected");
                    Err(ApiConnectionError::ApiError { status, error_body })
                }
            }
        }
    }
}

#[async_trait]
impl GenerativeBackend for Provider {
    async fn generate_json(
        &self,
        prompt: &str,
        schema: &JsonSchemaDefinition,
    ) -> Result<String, ApiConnectionError> {
        let request = ChatCompletionRequest {
            model: self.model().to_string(),
            messages: vec![
                ChatMessage::system(
                    "You are a meal planning assistant. Respond only with JSON matching the provided schema.",
                ),
                ChatMessage::user(prompt),
            ],
            response_format: Some(ResponseFormat::json_schema(schema.clone())),
            temperature: Some(0.4),
            max_tokens: Some(8192),
        };

        let response = self.call_chat_completion(request).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ApiConnectionError::EmptyCompletion)?;

        let json_text = strip_code_fences(&content);
        if json_text.is_empty() {
            return Err(ApiConnectionError::EmptyCompletion);
        }
        Ok(json_text.to_string())
    }
}
