use async_trait::async_trait;
use std::collections::{ HashMap, VecDeque };
use std::error::Error;
use tokio::sync::Mutex;
use super::HistoryStore;
use crate::models::chat::{ Conversation, ConversationTurn };

/// In-memory history store. Each conversation owns a queue capped at `limit`
/// turns; the oldest turn is dropped first. Nothing is persisted, so history
/// lives exactly as long as the process, matching the widget's session scope.
pub struct MemoryHistoryStore {
    limit: usize,
    sessions: Mutex<HashMap<String, VecDeque<ConversationTurn>>>,
}

impl MemoryHistoryStore {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(
        &self,
        conversation_id: &str,
        turn: ConversationTurn
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut sessions = self.sessions.lock().await;
        let turns = sessions.entry(conversation_id.to_string()).or_default();
        turns.push_back(turn);
        while turns.len() > self.limit {
            turns.pop_front();
        }
        Ok(())
    }

    async fn history(
        &self,
        conversation_id: &str
    ) -> Result<Conversation, Box<dyn Error + Send + Sync>> {
        let sessions = self.sessions.lock().await;
        let turns = sessions
            .get(conversation_id)
            .map(|queue| queue.iter().cloned().collect())
            .unwrap_or_default();
        Ok(Conversation {
            id: conversation_id.to_string(),
            turns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;

    #[tokio::test]
    async fn keeps_insertion_order() {
        let store = MemoryHistoryStore::new(10);
        store.append("c1", ConversationTurn::new(Role::User, "first")).await.unwrap();
        store.append("c1", ConversationTurn::new(Role::Assistant, "second")).await.unwrap();

        let conversation = store.history("c1").await.unwrap();
        assert_eq!(conversation.turns.len(), 2);
        assert_eq!(conversation.turns[0].text, "first");
        assert_eq!(conversation.turns[1].text, "second");
    }

    #[tokio::test]
    async fn trims_to_last_k_turns() {
        let store = MemoryHistoryStore::new(10);
        for n in 1..=11 {
            store
                .append("c1", ConversationTurn::new(Role::User, format!("turn {}", n))).await
                .unwrap();
        }

        let conversation = store.history("c1").await.unwrap();
        assert_eq!(conversation.turns.len(), 10);
        assert_eq!(conversation.turns[0].text, "turn 2");
        assert_eq!(conversation.turns[9].text, "turn 11");
    }

    #[tokio::test]
    async fn conversations_are_isolated() {
        let store = MemoryHistoryStore::new(10);
        store.append("c1", ConversationTurn::new(Role::User, "hello")).await.unwrap();

        let other = store.history("c2").await.unwrap();
        assert!(other.turns.is_empty());
    }

    #[tokio::test]
    async fn reads_have_no_side_effects() {
        let store = MemoryHistoryStore::new(10);
        store.append("c1", ConversationTurn::new(Role::User, "hello")).await.unwrap();

        let first = store.history("c1").await.unwrap();
        let second = store.history("c1").await.unwrap();
        assert_eq!(first.turns.len(), second.turns.len());
    }
}
