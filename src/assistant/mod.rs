pub mod http;

use async_trait::async_trait;
use serde::Deserialize;
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use crate::i18n::Lang;
use self::http::HttpAssistantClient;

/// Success payload of the hosted completion endpoint. Any other shape is
/// treated as a failure.
#[derive(Deserialize, Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant request failed: {0}")] Network(String),
    #[error("assistant returned an unusable payload: {0}")] InvalidResponse(String),
}

#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// One bounded round trip to the hosted assistant. No retries; the caller
    /// falls back locally on any error.
    async fn complete(
        &self,
        message: &str,
        language: Lang
    ) -> Result<CompletionResponse, AssistantError>;
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

pub fn new_client(
    config: &AssistantConfig
) -> Result<Arc<dyn AssistantClient>, Box<dyn StdError + Send + Sync>> {
    let client = HttpAssistantClient::from_config(config)?;
    Ok(Arc::new(client))
}
