// src/hunt/questions.rs

use std::collections::HashSet;

use validator::Validate;

use crate::{
    error::AppError,
    models::question::{Question, QuestionFile, QuestionId},
};

/// The immutable question table, loaded once at process start.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Builds a bank, rejecting empty tables and duplicate ids.
    pub fn new(questions: Vec<Question>) -> Result<Self, AppError> {
        let file = QuestionFile { questions };
        file.validate()?;

        let mut seen = HashSet::new();
        for q in &file.questions {
            if !seen.insert(q.id) {
                return Err(AppError::BadRequest(format!(
                    "Duplicate question id {}",
                    q.id
                )));
            }
        }

        Ok(Self {
            questions: file.questions,
        })
    }

    /// The six clues used when no question file is configured.
    pub fn builtin() -> Self {
        const ORDINALS: [&str; 6] = ["first", "second", "third", "fourth", "fifth", "sixth"];

        let questions = ORDINALS
            .iter()
            .zip(1..)
            .map(|(ordinal, id)| Question {
                id,
                prompt: format!("This is the {} question. What is the answer?", ordinal),
                answer: format!("answer{}", id),
            })
            .collect();

        Self { questions }
    }

    /// Parses and validates a JSON question file.
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let file: QuestionFile = serde_json::from_str(raw)?;
        Self::new(file.questions)
    }

    /// Loads the bank from `path` when given, otherwise falls back to the built-in table.
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    AppError::InternalServerError(format!("Cannot read {}: {}", path, e))
                })?;
                let bank = Self::from_json(&raw)?;
                tracing::info!("Loaded {} questions from {}", bank.len(), path);
                Ok(bank)
            }
            None => Ok(Self::builtin()),
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn ids(&self) -> Vec<QuestionId> {
        self.questions.iter().map(|q| q.id).collect()
    }

    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Trimmed, case-insensitive equality. No partial credit.
pub fn answer_matches(submitted: &str, expected: &str) -> bool {
    normalize(submitted) == normalize(expected)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
