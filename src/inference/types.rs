use serde::{Deserialize, Serialize};

/// Coarse complexity tier used to bias prompt phrasing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EducationLevel {
    /// Primary/basic education phrasing.
    Basic,
    /// Senior high school phrasing.
    #[default]
    Shs,
    /// Tertiary/university phrasing.
    Tertiary,
}

impl std::fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EducationLevel::Basic => write!(f, "basic"),
            EducationLevel::Shs => write!(f, "shs"),
            EducationLevel::Tertiary => write!(f, "tertiary"),
        }
    }
}

impl std::str::FromStr for EducationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(EducationLevel::Basic),
            "shs" => Ok(EducationLevel::Shs),
            "tertiary" => Ok(EducationLevel::Tertiary),
            _ => Err(format!("Unknown education level: {}", s)),
        }
    }
}

/// Message in an inference conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// Message role
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Request to run a completion against the inference service
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    /// Disable streaming; the session blocks on the full completion
    pub stream: bool,
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            stream: false,
        }
    }
}

/// Response from the inference service
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    pub completion: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_education_level_roundtrip() {
        for level in [
            EducationLevel::Basic,
            EducationLevel::Shs,
            EducationLevel::Tertiary,
        ] {
            let parsed = EducationLevel::from_str(&level.to_string()).unwrap();
            assert_eq!(parsed, level);
        }
    }

    #[test]
    fn test_education_level_unknown() {
        assert!(EducationLevel::from_str("postdoc").is_err());
    }

    #[test]
    fn test_completion_request_carries_stream_flag() {
        let request = CompletionRequest::new(vec![Message::user("hi")]);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"stream\":false"));
    }

    #[test]
    fn test_message_constructors() {
        let sys = Message::system("be concise");
        assert!(matches!(sys.role, MessageRole::System));
        let user = Message::user("hello");
        assert!(matches!(user.role, MessageRole::User));
        assert_eq!(user.content, "hello");
    }
}
