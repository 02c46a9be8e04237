//! # EduMate Session Service
//!
//! A study-assistant session service: questions and uploaded documents
//! are answered or summarized by an external inference service, and
//! every exchange is persisted as a browsable, pinnable chat history.
//!
//! ## Architecture
//!
//! ```text
//! UI render layer → Session Server (stdio JSON) → Coordinator
//!                                                     ↓
//!                              SQLite (chat history)  +  Inference HTTP
//! ```
//!
//! The coordinator translates one user-raised intent into exactly one
//! atomic state transition; the render layer then redraws from the
//! committed store and session state.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use edumate::{Config, SessionServer};
//! use edumate::extract::RemoteExtractor;
//! use edumate::inference::HttpInferenceClient;
//! use edumate::session::AppState;
//! use edumate::storage::SqliteStorage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let storage = SqliteStorage::new(&config.database).await?;
//!     let inference = HttpInferenceClient::new(&config.inference, config.request.clone())?;
//!     let extractor = RemoteExtractor::new(&config.inference, &config.request)?;
//!     let state = Arc::new(AppState::new(config, storage, Arc::new(inference), Arc::new(extractor)));
//!     SessionServer::new(state).run().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Configuration management for the session service.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Text extraction boundary for uploaded documents.
pub mod extract;
/// Inference service boundary (answering and summarizing).
pub mod inference;
/// Prompt templates biased by education level.
pub mod prompts;
/// Session state, intents, coordinator, and stdio server.
pub mod session;
/// SQLite chat history store.
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use session::{AppState, SessionServer, SessionState, SharedState};
