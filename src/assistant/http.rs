use async_trait::async_trait;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::Serialize;
use std::error::Error as StdError;
use super::{ AssistantClient, AssistantConfig, AssistantError, CompletionResponse };
use crate::i18n::Lang;

pub struct HttpAssistantClient {
    http: HttpClient,
    endpoint: String,
}

#[derive(Serialize)]
struct AssistantRequest<'a> {
    message: &'a str,
    language: &'a str,
}

impl HttpAssistantClient {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout: std::time::Duration
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", key))
                    .map_err(|e| format!("Invalid API key format: {}", e))?
            );
        }

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

        Ok(Self {
            http,
            endpoint: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AssistantConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Self::new(config.base_url.clone(), config.api_key.clone(), config.timeout)
    }
}

fn classify(err: reqwest::Error) -> AssistantError {
    if err.is_decode() {
        AssistantError::InvalidResponse(err.to_string())
    } else {
        AssistantError::Network(err.to_string())
    }
}

#[async_trait]
impl AssistantClient for HttpAssistantClient {
    async fn complete(
        &self,
        message: &str,
        language: Lang
    ) -> Result<CompletionResponse, AssistantError> {
        let req = AssistantRequest {
            message,
            language: language.as_str(),
        };

        let resp = self.http
            .post(&self.endpoint)
            .json(&req)
            .send().await
            .map_err(classify)?
            .error_for_status()
            .map_err(classify)?
            .json::<CompletionResponse>().await
            .map_err(classify)?;

        if resp.response.trim().is_empty() {
            return Err(AssistantError::InvalidResponse("empty response field".to_string()));
        }
        Ok(resp)
    }
}
