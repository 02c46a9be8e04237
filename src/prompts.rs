//! Prompt templates for the inference service.
//!
//! Centralized so the phrasing bias per education level lives in one
//! place rather than being scattered across handlers.

use crate::inference::EducationLevel;

/// System prompt for question answering at the given level
pub fn answer_prompt(level: EducationLevel) -> String {
    format!(
        "You are a study assistant. Answer the student's question accurately \
         and concisely. {} If document context is provided, ground your \
         answer in it; otherwise answer from general knowledge.",
        level_phrasing(level)
    )
}

/// User message combining question and optional document context.
/// An empty context falls back to the question standing alone.
pub fn answer_input(question: &str, context: &str) -> String {
    if context.trim().is_empty() {
        question.to_string()
    } else {
        format!("Context:\n{}\n\nQuestion: {}", context, question)
    }
}

/// System prompt for document summarization at the given level
pub fn summarize_prompt(level: EducationLevel) -> String {
    format!(
        "You are a study assistant. Summarize the provided document, \
         keeping the key points a student needs. {}",
        level_phrasing(level)
    )
}

fn level_phrasing(level: EducationLevel) -> &'static str {
    match level {
        EducationLevel::Basic => "Use simple words and short sentences suitable for a young learner.",
        EducationLevel::Shs => "Pitch the explanation at senior high school level.",
        EducationLevel::Tertiary => {
            "Use precise terminology suitable for a university student."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_input_empty_context_falls_back_to_question() {
        let input = answer_input("What is osmosis?", "  ");
        assert_eq!(input, "What is osmosis?");
    }

    #[test]
    fn test_answer_input_with_context() {
        let input = answer_input("What is osmosis?", "Chapter 3: transport in cells");
        assert!(input.contains("Context:"));
        assert!(input.contains("Chapter 3"));
        assert!(input.ends_with("Question: What is osmosis?"));
    }

    #[test]
    fn test_prompts_vary_by_level() {
        let basic = answer_prompt(EducationLevel::Basic);
        let tertiary = answer_prompt(EducationLevel::Tertiary);
        assert_ne!(basic, tertiary);
    }
}
