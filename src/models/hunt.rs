// src/models/hunt.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::QuestionId;

/// DTO for submitting an answer, shared by the JSON API and the HTML form.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    /// The clue the participant was looking at. A stale id is never accepted.
    pub question_id: Option<QuestionId>,

    /// Free text, at most 200 characters. Blank answers are allowed and simply never match.
    #[validate(length(max = 200))]
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    pub accepted: bool,
    pub current_step: usize,
    pub question_count: usize,
    /// True once every clue is answered (or the hunt expired).
    pub completed: bool,
}

/// Query parameters of the HTML page.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// `wrong` after a rejected answer.
    pub result: Option<String>,
}
