mod memory;

use async_trait::async_trait;
use log::info;
use std::error::Error;
use std::sync::Arc;
use crate::cli::Args;
use crate::models::chat::{ Conversation, ConversationTurn };

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends one turn to the conversation, evicting the oldest turns once
    /// the configured limit is exceeded.
    async fn append(
        &self,
        conversation_id: &str,
        turn: ConversationTurn
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Returns the conversation's turns in insertion order. No side effects.
    async fn history(
        &self,
        conversation_id: &str
    ) -> Result<Conversation, Box<dyn Error + Send + Sync>>;
}

pub fn create_history_store(
    args: &Args
) -> Result<Arc<dyn HistoryStore>, Box<dyn Error + Send + Sync>> {
    match args.history_type.to_lowercase().as_str() {
        "memory" => {
            let store = memory::MemoryHistoryStore::new(args.history_limit);
            Ok(Arc::new(store))
        }
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported history store type: {}", args.history_type)
                    )
                )
            ),
    }
}

pub fn initialize_history_store(
    args: &Args
) -> Result<Arc<dyn HistoryStore>, Box<dyn Error + Send + Sync>> {
    info!(
        "Chat history will be stored in: {} (last {} turns per conversation)",
        args.history_type,
        args.history_limit
    );
    create_history_store(args)
}
