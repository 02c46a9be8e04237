//! Inference service boundary.
//!
//! Answering and summarizing are externally supplied capabilities behind
//! a narrow `(question, context, level) -> text` contract. The service is
//! swappable without affecting the rest of the system; tests substitute a
//! stub implementation of [`Inference`].

mod client;
mod types;

pub use client::HttpInferenceClient;
pub use types::{CompletionRequest, CompletionResponse, EducationLevel, Message, MessageRole};

use async_trait::async_trait;

use crate::error::InferenceResult;

/// Inference capability boundary.
///
/// Calls are blocking from the session's point of view: the coordinator
/// waits for completion before persisting anything, and a failure
/// propagates as an error result with no record written. There is no
/// automatic retry.
#[async_trait]
pub trait Inference: Send + Sync {
    /// Answer a question, optionally grounded in document context.
    /// An empty context falls back to general question answering.
    async fn answer(
        &self,
        question: &str,
        context: &str,
        level: EducationLevel,
    ) -> InferenceResult<String>;

    /// Summarize a block of text at the given education level.
    async fn summarize(&self, text: &str, level: EducationLevel) -> InferenceResult<String>;
}
