// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Stable identifier of a question in the bank.
pub type QuestionId = u32;

/// A single clue of the hunt.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Question {
    pub id: QuestionId,

    /// The clue shown to the participant.
    #[validate(length(min = 1, max = 1000), custom(function = not_blank))]
    pub prompt: String,

    /// The expected answer. Compared trimmed and case-insensitively.
    /// Skipped during serialization so it never reaches a client.
    #[serde(skip_serializing)]
    #[validate(length(min = 1, max = 200), custom(function = not_blank))]
    pub answer: String,
}

/// Shape of a question file loaded via `HUNT_QUESTIONS_PATH`.
#[derive(Debug, Deserialize, Validate)]
pub struct QuestionFile {
    #[validate(length(min = 1), nested)]
    pub questions: Vec<Question>,
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}
