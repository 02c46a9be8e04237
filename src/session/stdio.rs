//! Line-oriented stdio protocol between the render layer and the
//! session coordinator.
//!
//! Each request line carries one intent; each response line carries the
//! render snapshot for the resulting state plus any toast. One intent,
//! one atomic transition, one consistent render.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use super::{render, Intent, Notice, RenderModel, SessionState, SharedState};

/// One request line from the render layer.
#[derive(Debug, Deserialize)]
pub struct UiRequest {
    /// Request identifier, echoed back in the response.
    pub id: u64,
    /// The user-raised intent.
    pub intent: Intent,
}

/// One response line to the render layer.
#[derive(Debug, Serialize)]
pub struct UiResponse {
    /// The request identifier this responds to (0 for parse failures).
    pub id: u64,
    /// Render snapshot on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderModel>,
    /// Toast notification, if the transition raised one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    /// Error message when the request could not be processed at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UiResponse {
    fn success(id: u64, render: RenderModel, notice: Option<Notice>) -> Self {
        Self {
            id,
            render: Some(render),
            notice,
            error: None,
        }
    }

    fn failure(id: u64, message: impl Into<String>) -> Self {
        Self {
            id,
            render: None,
            notice: None,
            error: Some(message.into()),
        }
    }
}

/// Session server running over stdio.
///
/// Owns the session presentation state for one UI session; intents are
/// handled strictly in order, each to completion before the next line
/// is read.
pub struct SessionServer {
    state: SharedState,
}

impl SessionServer {
    /// Create a new session server
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    /// Run the server using async stdio
    pub async fn run(&self) -> std::io::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run_with(stdin, stdout).await
    }

    /// Run the request loop over an arbitrary line-oriented transport
    pub async fn run_with<R, W>(&self, mut reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        // Fresh presentation state per session start
        let mut session = SessionState::default();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            // EOF reached
            if bytes_read == 0 {
                info!("EOF received, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            debug!(request = %trimmed, "Received request");

            let response = match serde_json::from_str::<UiRequest>(trimmed) {
                Ok(request) => {
                    let (next, response) = self.handle_request(session, request).await;
                    session = next;
                    response
                }
                Err(e) => {
                    error!(error = %e, "Failed to parse request");
                    UiResponse::failure(0, format!("Parse error: {}", e))
                }
            };

            let response_json = serde_json::to_string(&response)?;
            debug!(response = %response_json, "Sending response");

            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        Ok(())
    }

    /// Handle a single request: one transition, then a render built from
    /// the committed state
    async fn handle_request(
        &self,
        session: SessionState,
        request: UiRequest,
    ) -> (SessionState, UiResponse) {
        let transition = self
            .state
            .coordinator
            .handle_intent(session, request.intent)
            .await;

        match render::build(&self.state.storage, &transition.state).await {
            Ok(model) => {
                let response = UiResponse::success(request.id, model, transition.notice);
                (transition.state, response)
            }
            Err(e) => {
                error!(error = %e, "Failed to build render model");
                let response = UiResponse::failure(request.id, format!("Render error: {}", e));
                (transition.state, response)
            }
        }
    }
}
