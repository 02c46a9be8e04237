use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SessionState;
use crate::error::StorageResult;
use crate::inference::EducationLevel;
use crate::storage::{ChatRecord, SqliteStorage, Storage};

/// Everything the render layer needs to draw one consistent frame.
///
/// Built from the store and the session state after every transition,
/// never from cached fragments, so a frame can never mix pre- and
/// post-transition data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderModel {
    pub sidebar: Sidebar,
    /// Active chat transcript; `None` when no chat is active or the
    /// active reference turned out to be stale.
    pub transcript: Option<Transcript>,
    pub paused: bool,
    pub menu_open_for: Option<String>,
    pub editing_title_for: Option<String>,
    pub dark_mode: bool,
    pub education_level: EducationLevel,
    pub has_smart_context: bool,
}

/// Sidebar contents: search box plus the two disjoint chat lists.
/// Pinned and recent are independently ordered, each most-recently-
/// updated first; pinning a chat moves it between lists, it does not
/// reorder the other list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sidebar {
    pub search_query: String,
    pub pinned: Vec<ChatSummary>,
    pub recent: Vec<ChatSummary>,
}

/// One sidebar list entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSummary {
    pub id: String,
    pub title: String,
    pub pinned: bool,
    pub updated_at: DateTime<Utc>,
}

/// The active chat rendered as a two-message exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub id: String,
    pub title: String,
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
    pub answered_at: DateTime<Utc>,
}

impl From<&ChatRecord> for ChatSummary {
    fn from(chat: &ChatRecord) -> Self {
        Self {
            id: chat.id.clone(),
            title: chat.title.clone(),
            pinned: chat.pinned,
            updated_at: chat.updated_at,
        }
    }
}

impl From<ChatRecord> for Transcript {
    fn from(chat: ChatRecord) -> Self {
        Self {
            id: chat.id,
            title: chat.title,
            question: chat.question,
            answer: chat.answer,
            asked_at: chat.created_at,
            answered_at: chat.updated_at,
        }
    }
}

/// Build the render model for the current state.
///
/// A dangling `active_chat_id` degrades to an empty transcript; it is
/// never an error at render time.
pub async fn build(storage: &SqliteStorage, state: &SessionState) -> StorageResult<RenderModel> {
    let chats = storage.get_all_chats().await?;

    let query = state.search_query.trim().to_lowercase();
    let visible: Vec<&ChatRecord> = chats
        .iter()
        .filter(|c| query.is_empty() || c.title.to_lowercase().contains(&query))
        .collect();

    let pinned = visible
        .iter()
        .filter(|c| c.pinned)
        .map(|c| ChatSummary::from(*c))
        .collect();
    let recent = visible
        .iter()
        .filter(|c| !c.pinned)
        .map(|c| ChatSummary::from(*c))
        .collect();

    let transcript = match &state.active_chat_id {
        Some(id) => storage.get_chat(id).await?.map(Transcript::from),
        None => None,
    };

    Ok(RenderModel {
        sidebar: Sidebar {
            search_query: state.search_query.clone(),
            pinned,
            recent,
        },
        transcript,
        paused: state.paused,
        menu_open_for: state.pending_menu_for.clone(),
        editing_title_for: state.pending_edit_title_for.clone(),
        dark_mode: state.dark_mode,
        education_level: state.education_level,
        has_smart_context: state.smart_context.is_some(),
    })
}
