//! Session presentation state and intent handling.
//!
//! This module provides:
//! - The explicit, serializable [`SessionState`] for one UI session
//! - The [`Intent`] vocabulary raised by the render layer
//! - The coordinator translating one intent into one atomic transition
//! - The render model built from store + session state
//! - The stdio server speaking the line-oriented intent/render protocol

mod coordinator;
/// Render model built from store + session state.
pub mod render;
mod stdio;

pub use coordinator::{Coordinator, Transition};
pub use render::{ChatSummary, RenderModel, Sidebar, Transcript};
pub use stdio::SessionServer;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::extract::{DocumentKind, TextExtractor};
use crate::inference::{EducationLevel, Inference};
use crate::storage::SqliteStorage;

/// Ephemeral per-session presentation state.
///
/// One instance per active UI session, reset to defaults on session
/// start, never shared across sessions. Chat-id fields are weak
/// references: the record behind them may be deleted at any time, in
/// which case handling degrades to clearing the reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Chat currently displayed in the transcript view.
    pub active_chat_id: Option<String>,
    /// When true, input is suppressed and only a resume affordance shows.
    pub paused: bool,
    /// Chat with an open options menu, if any.
    pub pending_menu_for: Option<String>,
    /// Chat with an in-flight title edit, if any.
    pub pending_edit_title_for: Option<String>,
    /// Chat with an in-flight pin toggle, if any.
    pub pending_pin_toggle: Option<String>,
    /// Chat with an in-flight delete confirmation, if any.
    pub pending_delete: Option<String>,
    /// Sidebar search filter.
    pub search_query: String,
    /// Complexity tier for prompt phrasing.
    pub education_level: EducationLevel,
    /// Theme toggle; presentation only.
    pub dark_mode: bool,
    /// Text extracted from the last uploaded document, held transiently
    /// to seed suggested follow-up questions.
    pub smart_context: Option<String>,
}

impl SessionState {
    /// Discard any uncommitted pending menu action. Last intent wins:
    /// there is no queue of pending actions.
    fn clear_pending(&mut self) {
        self.pending_menu_for = None;
        self.pending_edit_title_for = None;
        self.pending_pin_toggle = None;
        self.pending_delete = None;
    }

    /// Drop every reference to a chat id that turned out to be stale.
    fn forget_chat(&mut self, id: &str) {
        if self.active_chat_id.as_deref() == Some(id) {
            self.active_chat_id = None;
        }
        if self.pending_menu_for.as_deref() == Some(id) {
            self.pending_menu_for = None;
        }
        if self.pending_edit_title_for.as_deref() == Some(id) {
            self.pending_edit_title_for = None;
        }
        if self.pending_pin_toggle.as_deref() == Some(id) {
            self.pending_pin_toggle = None;
        }
        if self.pending_delete.as_deref() == Some(id) {
            self.pending_delete = None;
        }
    }
}

/// One user-raised intent from the render layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// Ask a question; answered by the inference collaborator.
    AskQuestion { text: String },
    /// Upload a document and summarize it.
    SummarizeUpload { data: Vec<u8>, kind: DocumentKind },
    /// Open an existing chat in the transcript view.
    OpenChat { id: String },
    /// Open the options menu for a chat.
    OpenMenu { id: String },
    /// Close the options menu without acting.
    CloseMenu,
    /// From an open menu: start editing the title.
    RequestEditTitle,
    /// From an open menu: arm a pin toggle.
    RequestPinToggle,
    /// From an open menu: arm a delete.
    RequestDelete,
    /// Commit a pending title edit.
    SubmitTitle { title: String },
    /// Toggle pin, either armed via menu or directly on a sidebar item.
    TogglePin { id: Option<String> },
    /// Commit a pending delete.
    ConfirmDelete,
    /// Flip the paused flag.
    TogglePause,
    /// Overwrite the sidebar search filter.
    SetSearch { query: String },
    /// Overwrite the education level.
    SetLevel { level: EducationLevel },
    /// Overwrite the theme toggle.
    SetDarkMode { enabled: bool },
    /// Drop the transient smart context.
    ClearSmartContext,
}

/// Toast-style notification raised by a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Error,
}

impl Notice {
    /// Create an info notice
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    /// Create an error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Application state shared across the session loop.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// SQLite chat history store.
    pub storage: SqliteStorage,
    /// Intent coordinator.
    pub coordinator: Coordinator,
}

impl AppState {
    /// Create new application state
    pub fn new(
        config: Config,
        storage: SqliteStorage,
        inference: Arc<dyn Inference>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        let coordinator = Coordinator::new(storage.clone(), inference, extractor);
        Self {
            config,
            storage,
            coordinator,
        }
    }
}

/// Shared application state handle
pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_state_defaults() {
        let state = SessionState::default();
        assert!(state.active_chat_id.is_none());
        assert!(!state.paused);
        assert!(state.pending_menu_for.is_none());
        assert!(state.search_query.is_empty());
        assert_eq!(state.education_level, EducationLevel::Shs);
        assert!(state.smart_context.is_none());
    }

    #[test]
    fn test_clear_pending_discards_all_arms() {
        let mut state = SessionState {
            pending_menu_for: Some("a".into()),
            pending_edit_title_for: Some("a".into()),
            pending_pin_toggle: Some("b".into()),
            pending_delete: Some("c".into()),
            ..Default::default()
        };
        state.clear_pending();
        assert!(state.pending_menu_for.is_none());
        assert!(state.pending_edit_title_for.is_none());
        assert!(state.pending_pin_toggle.is_none());
        assert!(state.pending_delete.is_none());
    }

    #[test]
    fn test_forget_chat_only_clears_matching_references() {
        let mut state = SessionState {
            active_chat_id: Some("gone".into()),
            pending_menu_for: Some("other".into()),
            ..Default::default()
        };
        state.forget_chat("gone");
        assert!(state.active_chat_id.is_none());
        assert_eq!(state.pending_menu_for.as_deref(), Some("other"));
    }

    #[test]
    fn test_intent_serde_roundtrip() {
        let intent = Intent::AskQuestion {
            text: "What is photosynthesis?".to_string(),
        };
        let json = serde_json::to_string(&intent).unwrap();
        assert!(json.contains("ask_question"));
        let back: Intent = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, Intent::AskQuestion { .. }));
    }
}
