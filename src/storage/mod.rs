//! Storage layer for chat history persistence.
//!
//! The chat history store is the sole writer of persisted state: every
//! create, update, pin toggle, and delete goes through the [`Storage`]
//! trait so in-memory and persisted copies can never diverge.

mod sqlite;

pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageResult;

/// One persisted question/answer or document/summary exchange.
///
/// `question` and `answer` are immutable after creation; there is no
/// in-place regeneration of an answer. Title and pin state are mutable
/// through the store, which refreshes `updated_at` on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRecord {
    /// Unique chat identifier, assigned at creation, never reused.
    pub id: String,
    /// Short display label.
    pub title: String,
    /// Original user input or synthesized prompt text.
    pub question: String,
    /// Model-produced response text.
    pub answer: String,
    /// Whether the chat is pinned in the sidebar.
    pub pinned: bool,
    /// When the chat was created.
    pub created_at: DateTime<Utc>,
    /// When the chat was last mutated. Always >= `created_at`.
    pub updated_at: DateTime<Utc>,
}

impl ChatRecord {
    /// Create a new chat record with a fresh id and matching timestamps
    pub fn new(
        title: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            question: question.into(),
            answer: answer.into(),
            pinned: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the pinned flag
    pub fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }
}

/// Partial update for a chat record.
///
/// Fields left as `None` are not touched. The store refreshes
/// `updated_at` whenever at least the update is applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatUpdate {
    /// New title, if the title is being edited.
    pub title: Option<String>,
}

impl ChatUpdate {
    /// Create an update that only changes the title
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

/// Storage trait for chat history persistence.
///
/// Every mutating operation is immediately durable: there is no
/// write-behind or batching, so a successful return implies
/// read-after-write consistency for the single-writer session pattern.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist a new chat record. A storage fault surfaces to the caller;
    /// nothing partial is ever written.
    async fn create_chat(&self, chat: &ChatRecord) -> StorageResult<()>;

    /// Point lookup by id. Absent is an expected outcome (e.g. after
    /// deletion from another session), not an error.
    async fn get_chat(&self, id: &str) -> StorageResult<Option<ChatRecord>>;

    /// All records, most-recently-updated first. Design choice: recency
    /// order is the most useful default for history views; pinned and
    /// unpinned records are interleaved here and split by the caller.
    async fn get_all_chats(&self) -> StorageResult<Vec<ChatRecord>>;

    /// Apply a partial update and refresh `updated_at`. Fails with
    /// `ChatNotFound` if the id is absent.
    async fn update_chat(&self, id: &str, update: &ChatUpdate) -> StorageResult<()>;

    /// Flip the pinned flag, refresh `updated_at`, and return the new
    /// value. Fails with `ChatNotFound` if the id is absent.
    async fn toggle_pin(&self, id: &str) -> StorageResult<bool>;

    /// Permanently remove a record. Fails with `ChatNotFound` if the id
    /// is absent; callers holding the id as their active chat are
    /// responsible for clearing that reference themselves.
    async fn delete_chat(&self, id: &str) -> StorageResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_chat_record_timestamps_match() {
        let chat = ChatRecord::new("Title", "What is photosynthesis?", "A process...");
        assert_eq!(chat.created_at, chat.updated_at);
        assert!(!chat.pinned);
        assert!(!chat.id.is_empty());
    }

    #[test]
    fn test_new_chat_record_unique_ids() {
        let a = ChatRecord::new("t", "q", "a");
        let b = ChatRecord::new("t", "q", "a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_with_pinned() {
        let chat = ChatRecord::new("t", "q", "a").with_pinned(true);
        assert!(chat.pinned);
    }

    #[test]
    fn test_chat_update_title_only() {
        let update = ChatUpdate::title("New title");
        assert_eq!(update.title.as_deref(), Some("New title"));

        let empty = ChatUpdate::default();
        assert!(empty.title.is_none());
    }
}
