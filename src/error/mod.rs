use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection failed: {message}")]
    Connection { message: String },

    #[error("Chat not found: {chat_id}")]
    ChatNotFound { chat_id: String },

    #[error("Migration failed: {message}")]
    Migration { message: String },

    #[error("Corrupt record {chat_id}: {message}")]
    Corrupt { chat_id: String, message: String },

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl StorageError {
    /// Whether this is a missing-record condition rather than a storage
    /// fault. NotFound is recovered locally by clearing the stale reference.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::ChatNotFound { .. })
    }
}

/// Inference service errors
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Text extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Empty document")]
    EmptyDocument,

    #[error("Extraction service error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Session coordinator errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Input is paused")]
    Paused,
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for inference operations
pub type InferenceResult<T> = Result<T, InferenceError>;

/// Result type alias for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config {
            message: "missing key".to_string(),
        };
        assert_eq!(err.to_string(), "Configuration error: missing key");

        let err = AppError::Internal {
            message: "unexpected".to_string(),
        };
        assert_eq!(err.to_string(), "Internal error: unexpected");
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Connection {
            message: "failed to connect".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Database connection failed: failed to connect"
        );

        let err = StorageError::ChatNotFound {
            chat_id: "chat-123".to_string(),
        };
        assert_eq!(err.to_string(), "Chat not found: chat-123");

        let err = StorageError::Migration {
            message: "version mismatch".to_string(),
        };
        assert_eq!(err.to_string(), "Migration failed: version mismatch");

        let err = StorageError::Corrupt {
            chat_id: "chat-123".to_string(),
            message: "bad created_at".to_string(),
        };
        assert_eq!(err.to_string(), "Corrupt record chat-123: bad created_at");
    }

    #[test]
    fn test_storage_error_not_found_classification() {
        let not_found = StorageError::ChatNotFound {
            chat_id: "x".to_string(),
        };
        assert!(not_found.is_not_found());

        let fault = StorageError::Connection {
            message: "down".to_string(),
        };
        assert!(!fault.is_not_found());
    }

    #[test]
    fn test_inference_error_display() {
        let err = InferenceError::Api {
            status: 401,
            message: "unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 401 - unauthorized");

        let err = InferenceError::InvalidResponse {
            message: "malformed JSON".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid response: malformed JSON");

        let err = InferenceError::Timeout { timeout_ms: 5000 };
        assert_eq!(err.to_string(), "Request timeout after 5000ms");
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::InvalidInput {
            field: "question".to_string(),
            reason: "cannot be empty".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid input: question - cannot be empty");

        assert_eq!(SessionError::Paused.to_string(), "Input is paused");
    }

    #[test]
    fn test_storage_error_conversion_to_app_error() {
        let storage_err = StorageError::ChatNotFound {
            chat_id: "test-123".to_string(),
        };
        let app_err: AppError = storage_err.into();
        assert!(matches!(app_err, AppError::Storage(_)));
    }

    #[test]
    fn test_inference_error_conversion_to_app_error() {
        let inference_err = InferenceError::Timeout { timeout_ms: 1000 };
        let app_err: AppError = inference_err.into();
        assert!(matches!(app_err, AppError::Inference(_)));
    }

    #[test]
    fn test_session_error_conversion_to_app_error() {
        let session_err = SessionError::Paused;
        let app_err: AppError = session_err.into();
        assert!(matches!(app_err, AppError::Session(_)));
    }
}
