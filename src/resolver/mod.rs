use log::{ info, warn };
use std::error::Error;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use crate::assistant::{ AssistantClient, AssistantError };
use crate::config::faq::{ self, FaqConfig };
use crate::history::HistoryStore;
use crate::i18n::{ self, Lang, MessageKey };
use crate::models::chat::{ Conversation, ConversationTurn, Role };

/// Why the remote path did not produce an answer. `NetworkFailure` and
/// `InvalidResponseShape` are recovered by the keyword fallback and never
/// surfaced to the user; `NoKeywordMatch` is a defined outcome that maps to
/// the localized apology.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("remote assistant unreachable: {0}")] NetworkFailure(String),
    #[error("remote assistant payload unusable: {0}")] InvalidResponseShape(String),
    #[error("no FAQ entry matched the query")] NoKeywordMatch,
}

impl From<AssistantError> for ResolveError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Network(msg) => ResolveError::NetworkFailure(msg),
            AssistantError::InvalidResponse(msg) => ResolveError::InvalidResponseShape(msg),
        }
    }
}

/// Orchestrates remote-first, local-fallback answer selection and owns the
/// conversation history updates. One `resolve` call settles one turn: the
/// user turn and exactly one assistant turn (remote answer, FAQ answer, or
/// apology) are appended, then the history is trimmed by the store.
pub struct ChatAgent {
    assistant: Option<Arc<dyn AssistantClient>>,
    history: Arc<dyn HistoryStore>,
    faq: RwLock<Arc<FaqConfig>>,
    whatsapp_number: String,
}

impl ChatAgent {
    pub fn new(
        assistant: Option<Arc<dyn AssistantClient>>,
        history: Arc<dyn HistoryStore>,
        faq: Arc<FaqConfig>,
        whatsapp_number: String
    ) -> Self {
        Self {
            assistant,
            history,
            faq: RwLock::new(faq),
            whatsapp_number,
        }
    }

    /// Resolves one user query. Always produces a non-empty answer; the only
    /// error path is the history store itself.
    pub async fn resolve(
        &self,
        conversation_id: &str,
        query: &str,
        lang: Lang
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        self.history.append(conversation_id, ConversationTurn::new(Role::User, query)).await?;

        let answer = match self.try_remote(query, lang).await {
            Ok(text) => text,
            Err(err) => {
                warn!("Remote assistant unavailable, using FAQ fallback: {}", err);
                match self.try_local(query, lang).await {
                    Ok(text) => text,
                    Err(ResolveError::NoKeywordMatch) => self.apology(lang),
                    Err(other) => {
                        warn!("FAQ fallback failed unexpectedly: {}", other);
                        self.apology(lang)
                    }
                }
            }
        };

        self.history
            .append(conversation_id, ConversationTurn::new(Role::Assistant, answer.clone())).await?;
        Ok(answer)
    }

    async fn try_remote(&self, query: &str, lang: Lang) -> Result<String, ResolveError> {
        let client = self.assistant
            .as_ref()
            .ok_or_else(|| {
                ResolveError::NetworkFailure("no assistant endpoint configured".to_string())
            })?;
        let completion = client.complete(query, lang).await?;
        Ok(completion.response)
    }

    async fn try_local(&self, query: &str, lang: Lang) -> Result<String, ResolveError> {
        let faq = self.faq.read().await;
        faq::find_answer(query, &faq, lang)
            .map(|answer| answer.to_string())
            .ok_or(ResolveError::NoKeywordMatch)
    }

    fn apology(&self, lang: Lang) -> String {
        i18n
            ::message(MessageKey::NoAnswerApology, lang)
            .replace("{whatsapp}", &self.whatsapp_number)
    }

    pub fn welcome(&self, lang: Lang) -> String {
        i18n::message(MessageKey::ChatWelcome, lang).to_string()
    }

    pub async fn history(
        &self,
        conversation_id: &str
    ) -> Result<Conversation, Box<dyn Error + Send + Sync>> {
        self.history.history(conversation_id).await
    }

    pub async fn faq_snapshot(&self) -> Arc<FaqConfig> {
        self.faq.read().await.clone()
    }

    /// Swaps in a fresh FAQ table if the file changed since the last load.
    pub async fn reload_faq_if_changed(
        &self,
        path: &str
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let current = self.faq.read().await.clone();
        match faq::reload_faq_if_changed(path, &current)? {
            Some(new_config) => {
                let mut guard = self.faq.write().await;
                *guard = new_config;
                info!("FAQ table reloaded from {}", path);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
