use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{Intent, Notice, SessionState};
use crate::error::StorageError;
use crate::extract::{DocumentKind, TextExtractor};
use crate::inference::Inference;
use crate::storage::{ChatRecord, ChatUpdate, SqliteStorage, Storage};

/// Maximum length of a title synthesized from a question
const TITLE_MAX_LEN: usize = 25;

/// Result of handling one intent: the next session state plus an
/// optional toast. Collaborator failures never escape as errors; they
/// become user-visible notices so the session loop cannot crash.
#[derive(Debug)]
pub struct Transition {
    pub state: SessionState,
    pub notice: Option<Notice>,
}

impl Transition {
    fn silent(state: SessionState) -> Self {
        Self {
            state,
            notice: None,
        }
    }

    fn with_notice(state: SessionState, notice: Notice) -> Self {
        Self {
            state,
            notice: Some(notice),
        }
    }
}

/// Translates one user-raised intent into exactly one state transition.
///
/// Each intent is handled to completion (store mutation plus state
/// update) before the next is accepted; there is no overlap between two
/// intents within one session.
pub struct Coordinator {
    storage: SqliteStorage,
    inference: Arc<dyn Inference>,
    extractor: Arc<dyn TextExtractor>,
}

impl Coordinator {
    /// Create a new coordinator
    pub fn new(
        storage: SqliteStorage,
        inference: Arc<dyn Inference>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            storage,
            inference,
            extractor,
        }
    }

    /// Handle one intent atomically. No partial application: either the
    /// full effect lands (store write plus state update) or the state
    /// comes back unchanged with an explanatory notice.
    pub async fn handle_intent(&self, state: SessionState, intent: Intent) -> Transition {
        debug!(intent = ?intent_name(&intent), "Handling intent");

        match intent {
            Intent::AskQuestion { text } => self.ask_question(state, text).await,
            Intent::SummarizeUpload { data, kind } => self.summarize_upload(state, data, kind).await,
            Intent::OpenChat { id } => self.open_chat(state, id).await,
            Intent::OpenMenu { id } => self.open_menu(state, id).await,
            Intent::CloseMenu => {
                let mut state = state;
                state.clear_pending();
                Transition::silent(state)
            }
            Intent::RequestEditTitle => Self::arm_pending(state, PendingArm::EditTitle),
            Intent::RequestPinToggle => Self::arm_pending(state, PendingArm::PinToggle),
            Intent::RequestDelete => Self::arm_pending(state, PendingArm::Delete),
            Intent::SubmitTitle { title } => self.submit_title(state, title).await,
            Intent::TogglePin { id } => self.toggle_pin(state, id).await,
            Intent::ConfirmDelete => self.confirm_delete(state).await,
            Intent::TogglePause => {
                let mut state = state;
                state.paused = !state.paused;
                let message = if state.paused {
                    "Chat paused"
                } else {
                    "Chat resumed"
                };
                Transition::with_notice(state, Notice::info(message))
            }
            Intent::SetSearch { query } => {
                let mut state = state;
                state.search_query = query;
                Transition::silent(state)
            }
            Intent::SetLevel { level } => {
                let mut state = state;
                state.education_level = level;
                Transition::silent(state)
            }
            Intent::SetDarkMode { enabled } => {
                let mut state = state;
                state.dark_mode = enabled;
                Transition::silent(state)
            }
            Intent::ClearSmartContext => {
                let mut state = state;
                state.smart_context = None;
                Transition::silent(state)
            }
        }
    }

    /// Ask a question: answer via inference, then persist the exchange.
    /// No record is created for a failed or rejected attempt.
    async fn ask_question(&self, mut state: SessionState, text: String) -> Transition {
        if state.paused {
            return Transition::with_notice(state, Notice::error("Chat is paused"));
        }

        let question = text.trim();
        if question.is_empty() {
            return Transition::with_notice(state, Notice::error("Question cannot be empty"));
        }

        let context = state.smart_context.as_deref().unwrap_or("");

        let answer = match self
            .inference
            .answer(question, context, state.education_level)
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "Inference failed, nothing persisted");
                return Transition::with_notice(
                    state,
                    Notice::error(format!("Could not answer: {}", e)),
                );
            }
        };

        let chat = ChatRecord::new(truncate_title(question), question, answer);

        if let Err(e) = self.storage.create_chat(&chat).await {
            warn!(error = %e, "Failed to persist chat");
            return Transition::with_notice(
                state,
                Notice::error(format!("Could not save chat: {}", e)),
            );
        }

        info!(chat_id = %chat.id, "Question answered and saved");

        state.active_chat_id = Some(chat.id);
        Transition::with_notice(state, Notice::info("Response saved"))
    }

    /// Summarize an uploaded document. The stale smart context is
    /// replaced only after the new record is durably created.
    async fn summarize_upload(
        &self,
        mut state: SessionState,
        data: Vec<u8>,
        kind: DocumentKind,
    ) -> Transition {
        if state.paused {
            return Transition::with_notice(state, Notice::error("Chat is paused"));
        }

        if data.is_empty() {
            return Transition::with_notice(state, Notice::error("No file provided"));
        }

        let text = match self.extractor.extract(&data, kind).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, kind = %kind, "Text extraction failed");
                return Transition::with_notice(
                    state,
                    Notice::error(format!("Could not read document: {}", e)),
                );
            }
        };

        let summary = match self.inference.summarize(&text, state.education_level).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "Summarization failed, nothing persisted");
                return Transition::with_notice(
                    state,
                    Notice::error(format!("Could not summarize: {}", e)),
                );
            }
        };

        let chat = ChatRecord::new("Document Summary", "Summarize this document", summary);

        if let Err(e) = self.storage.create_chat(&chat).await {
            warn!(error = %e, "Failed to persist summary chat");
            return Transition::with_notice(
                state,
                Notice::error(format!("Could not save chat: {}", e)),
            );
        }

        info!(chat_id = %chat.id, "Document summarized and saved");

        state.active_chat_id = Some(chat.id);
        state.smart_context = Some(text);
        Transition::with_notice(state, Notice::info("Summary created!"))
    }

    async fn open_chat(&self, mut state: SessionState, id: String) -> Transition {
        match self.storage.get_chat(&id).await {
            Ok(Some(chat)) => {
                state.active_chat_id = Some(chat.id);
                Transition::silent(state)
            }
            Ok(None) => {
                // Stale reference, e.g. deleted from another session
                state.forget_chat(&id);
                Transition::with_notice(state, Notice::error("Chat no longer exists"))
            }
            Err(e) => Transition::with_notice(state, Notice::error(format!("Storage error: {}", e))),
        }
    }

    async fn open_menu(&self, mut state: SessionState, id: String) -> Transition {
        match self.storage.get_chat(&id).await {
            Ok(Some(_)) => {
                // Opening a menu discards any prior uncommitted action
                state.clear_pending();
                state.pending_menu_for = Some(id);
                Transition::silent(state)
            }
            Ok(None) => {
                state.forget_chat(&id);
                Transition::with_notice(state, Notice::error("Chat no longer exists"))
            }
            Err(e) => Transition::with_notice(state, Notice::error(format!("Storage error: {}", e))),
        }
    }

    /// Arm one of the menu sub-actions for the chat whose menu is open
    fn arm_pending(mut state: SessionState, arm: PendingArm) -> Transition {
        let Some(id) = state.pending_menu_for.clone() else {
            return Transition::with_notice(state, Notice::error("No menu is open"));
        };

        match arm {
            PendingArm::EditTitle => state.pending_edit_title_for = Some(id),
            PendingArm::PinToggle => state.pending_pin_toggle = Some(id),
            PendingArm::Delete => state.pending_delete = Some(id),
        }

        Transition::silent(state)
    }

    async fn submit_title(&self, mut state: SessionState, title: String) -> Transition {
        let Some(id) = state.pending_edit_title_for.clone() else {
            return Transition::with_notice(state, Notice::error("No title edit in progress"));
        };

        let title = title.trim();
        if title.is_empty() {
            // Keep the edit armed so the user can correct the input
            return Transition::with_notice(state, Notice::error("Title cannot be empty"));
        }

        match self.storage.update_chat(&id, &ChatUpdate::title(title)).await {
            Ok(()) => {
                state.clear_pending();
                Transition::with_notice(state, Notice::info("Title updated"))
            }
            Err(e) if e.is_not_found() => {
                state.forget_chat(&id);
                state.clear_pending();
                Transition::with_notice(state, Notice::error("Chat no longer exists"))
            }
            Err(e) => Transition::with_notice(state, Notice::error(format!("Storage error: {}", e))),
        }
    }

    async fn toggle_pin(&self, mut state: SessionState, id: Option<String>) -> Transition {
        let Some(id) = id.or_else(|| state.pending_pin_toggle.clone()) else {
            return Transition::with_notice(state, Notice::error("No chat selected to pin"));
        };

        match self.storage.toggle_pin(&id).await {
            Ok(pinned) => {
                state.clear_pending();
                let message = if pinned { "Pinned!" } else { "Unpinned!" };
                Transition::with_notice(state, Notice::info(message))
            }
            Err(StorageError::ChatNotFound { .. }) => {
                state.forget_chat(&id);
                state.clear_pending();
                Transition::with_notice(state, Notice::error("Chat no longer exists"))
            }
            Err(e) => Transition::with_notice(state, Notice::error(format!("Storage error: {}", e))),
        }
    }

    async fn confirm_delete(&self, mut state: SessionState) -> Transition {
        let Some(id) = state.pending_delete.clone() else {
            return Transition::with_notice(state, Notice::error("No delete in progress"));
        };

        match self.storage.delete_chat(&id).await {
            Ok(()) => {
                state.forget_chat(&id);
                state.clear_pending();
                Transition::with_notice(state, Notice::info("Chat deleted"))
            }
            Err(StorageError::ChatNotFound { .. }) => {
                // Already gone; clearing the references is all that's left
                state.forget_chat(&id);
                state.clear_pending();
                Transition::with_notice(state, Notice::info("Chat deleted"))
            }
            Err(e) => Transition::with_notice(state, Notice::error(format!("Storage error: {}", e))),
        }
    }
}

enum PendingArm {
    EditTitle,
    PinToggle,
    Delete,
}

/// Synthesize a display title from the question text
fn truncate_title(question: &str) -> String {
    if question.chars().count() > TITLE_MAX_LEN {
        let truncated: String = question.chars().take(TITLE_MAX_LEN).collect();
        format!("{}...", truncated)
    } else {
        question.to_string()
    }
}

fn intent_name(intent: &Intent) -> &'static str {
    match intent {
        Intent::AskQuestion { .. } => "ask_question",
        Intent::SummarizeUpload { .. } => "summarize_upload",
        Intent::OpenChat { .. } => "open_chat",
        Intent::OpenMenu { .. } => "open_menu",
        Intent::CloseMenu => "close_menu",
        Intent::RequestEditTitle => "request_edit_title",
        Intent::RequestPinToggle => "request_pin_toggle",
        Intent::RequestDelete => "request_delete",
        Intent::SubmitTitle { .. } => "submit_title",
        Intent::TogglePin { .. } => "toggle_pin",
        Intent::ConfirmDelete => "confirm_delete",
        Intent::TogglePause => "toggle_pause",
        Intent::SetSearch { .. } => "set_search",
        Intent::SetLevel { .. } => "set_level",
        Intent::SetDarkMode { .. } => "set_dark_mode",
        Intent::ClearSmartContext => "clear_smart_context",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_title_short_question_unchanged() {
        assert_eq!(truncate_title("Short one"), "Short one");
    }

    #[test]
    fn test_truncate_title_long_question_gets_ellipsis() {
        let long = "What is the role of chlorophyll in photosynthesis?";
        let title = truncate_title(long);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), TITLE_MAX_LEN + 3);
    }

    #[test]
    fn test_truncate_title_exact_boundary() {
        let exact: String = "x".repeat(TITLE_MAX_LEN);
        assert_eq!(truncate_title(&exact), exact);
    }
}
