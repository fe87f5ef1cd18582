// src/hunt/session.rs

use std::fmt;

use chrono::{DateTime, Utc};
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use super::questions::{QuestionBank, answer_matches};
use crate::models::question::QuestionId;

/// Contract violations by the presentation layer.
/// The session is left untouched whenever one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuntError {
    /// `start` called on a session that already began its attempt.
    AlreadyStarted,
    /// `stop_timer` called before every clue was answered.
    NotAwaitingStop,
    /// `stop_timer` called twice.
    AlreadyStopped,
}

impl fmt::Display for HuntError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            HuntError::AlreadyStarted => "The hunt has already been started",
            HuntError::NotAwaitingStop => "The hunt is not finished yet",
            HuntError::AlreadyStopped => "The timer has already been stopped",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for HuntError {}

/// Lifecycle position derived from the session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HuntPhase {
    NotStarted,
    Active,
    /// Every clue answered, or time ran out, but the timer is not stopped.
    AwaitingStop,
    Completed,
}

/// Result of one answer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub accepted: bool,
    pub current_step: usize,
    pub completed: bool,
}

/// One participant's single attempt at the hunt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HuntSession {
    pub is_running: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_elapsed_seconds: Option<f64>,
    pub current_step: usize,
    pub question_order: Vec<QuestionId>,
}

impl HuntSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, question_count: usize) -> HuntPhase {
        if self.end_time.is_some() {
            HuntPhase::Completed
        } else if self.start_time.is_none() {
            HuntPhase::NotStarted
        } else if self.is_running && self.current_step < question_count {
            HuntPhase::Active
        } else {
            HuntPhase::AwaitingStop
        }
    }

    /// Seconds since the hunt began, or zero before it did.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> f64 {
        match self.start_time {
            Some(start) => seconds_between(start, now),
            None => 0.0,
        }
    }

    /// Begins the attempt with a fresh random clue order.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        bank: &QuestionBank,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<(), HuntError> {
        if self.start_time.is_some() {
            return Err(HuntError::AlreadyStarted);
        }

        let mut order = bank.ids();
        order.shuffle(rng);

        self.question_order = order;
        self.start_time = Some(now);
        self.current_step = 0;
        self.is_running = true;
        Ok(())
    }

    /// Forces completion once the time limit is exceeded while clues remain.
    /// Returns true only on the call that performs the transition.
    pub fn check_expiry(&mut self, question_count: usize, time_limit: u64, now: DateTime<Utc>) -> bool {
        if self.phase(question_count) != HuntPhase::Active {
            return false;
        }
        let limit = time_limit as f64;
        if self.elapsed_seconds(now) <= limit {
            return false;
        }

        self.is_running = false;
        self.total_elapsed_seconds = Some(limit);
        self.current_step = question_count;
        true
    }

    /// The clue the participant is currently on, if the hunt is active.
    pub fn current_question(&self, question_count: usize) -> Option<QuestionId> {
        if self.phase(question_count) != HuntPhase::Active {
            return None;
        }
        self.question_order.get(self.current_step).copied()
    }

    /// Checks an answer against the current clue.
    ///
    /// `question_id` guards against stale forms: when given, it must name the
    /// current clue. Anything that is not a correct answer to an active clue
    /// is an ordinary rejection and leaves the session unchanged.
    pub fn submit_answer(
        &mut self,
        bank: &QuestionBank,
        question_id: Option<QuestionId>,
        text: &str,
        time_limit: u64,
        now: DateTime<Utc>,
    ) -> AnswerOutcome {
        let count = bank.len();
        self.check_expiry(count, time_limit, now);

        let accepted = match self.current_question(count) {
            Some(current) if question_id.is_none_or(|id| id == current) => bank
                .get(current)
                .is_some_and(|q| answer_matches(text, &q.answer)),
            _ => false,
        };

        if accepted {
            self.current_step += 1;
        }

        AnswerOutcome {
            accepted,
            current_step: self.current_step,
            completed: self.current_step >= count,
        }
    }

    /// Stops the clock once every clue is answered (or time ran out).
    ///
    /// A total already pinned by expiry is kept as is.
    pub fn stop_timer(&mut self, question_count: usize, now: DateTime<Utc>) -> Result<(), HuntError> {
        if self.end_time.is_some() {
            return Err(HuntError::AlreadyStopped);
        }
        let start = match self.start_time {
            Some(start) if self.current_step >= question_count => start,
            _ => return Err(HuntError::NotAwaitingStop),
        };

        self.end_time = Some(now);
        self.is_running = false;
        if self.total_elapsed_seconds.is_none() {
            self.total_elapsed_seconds = Some(seconds_between(start, now));
        }
        Ok(())
    }
}

/// Wall-clock seconds from `from` to `to`, clamped at zero for clock skew.
fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let millis = (to - from).num_milliseconds().max(0);
    millis as f64 / 1000.0
}
