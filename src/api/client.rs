use super::models::{ChatRequest, ListModelsResponse, ModelInfo, RequestBody};
use super::response::{api_error, extract_text};
use super::ModelApi;
use crate::config::defaults::DEFAULT_API_ENDPOINT;
use crate::error::{GemchatError, GenerationError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_MODEL_PAGES: usize = 20;

/// HTTP client for the Gemini `generateContent` and `models.list` endpoints.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_API_ENDPOINT, timeout_secs)
    }

    pub fn with_base_url(api_key: &str, base_url: &str, timeout_secs: u64) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| GemchatError::ConfigError(format!("Invalid API key: {}", e)))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(GenerationError::from)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn read_json(response: reqwest::Response) -> std::result::Result<Value, GenerationError> {
        let status = response.status();
        let body = response.text().await?;
        log::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ModelApi for GeminiClient {
    async fn generate(&self, request: &ChatRequest) -> std::result::Result<String, GenerationError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        let body = RequestBody::from(request);

        log::debug!(
            "Sending turn to {} with {} history entries",
            request.model,
            request.history.len()
        );

        let response = self.client.post(&url).json(&body).send().await?;
        let json = Self::read_json(response).await?;
        extract_text(&json)
    }

    async fn list_models(&self) -> std::result::Result<Vec<ModelInfo>, GenerationError> {
        let url = format!("{}/models", self.base_url);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        for _ in 0..MAX_MODEL_PAGES {
            let mut query = vec![("pageSize", "1000".to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self.client.get(&url).query(&query).send().await?;
            let json = Self::read_json(response).await?;
            let page: ListModelsResponse = serde_json::from_value(json)?;
            models.extend(page.models);

            // A repeated token would page forever
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) if seen_tokens.insert(token.clone()) => page_token = Some(token),
                Some(token) => {
                    log::warn!("Model listing repeated page token {}, stopping", token);
                    break;
                }
                None => break,
            }
        }

        log::debug!("Listed {} models", models.len());
        Ok(models)
    }
}
