// src/hunt/view.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    questions::QuestionBank,
    session::{HuntPhase, HuntSession},
};
use crate::{models::question::QuestionId, utils::time_fmt::format_elapsed};

/// Which page the participant should see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Start,
    Active,
    End,
}

/// Everything the presentation layer needs to render one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub screen: Screen,
    pub phase: HuntPhase,
    pub time_limit_seconds: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_display: Option<String>,

    /// 1-based position of the current clue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clue_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<QuestionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_fraction: Option<f64>,

    /// End screen only: true until the timer is stopped.
    pub awaiting_stop: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_elapsed_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ran_out_of_time: Option<bool>,
}

impl ViewModel {
    /// Pure read of the session. Run the expiry check before calling this.
    pub fn build(
        session: &HuntSession,
        bank: &QuestionBank,
        time_limit: u64,
        now: DateTime<Utc>,
    ) -> Self {
        let count = bank.len();
        let mut view = Self {
            screen: select_screen(session, count),
            phase: session.phase(count),
            time_limit_seconds: time_limit,
            elapsed_seconds: None,
            elapsed_display: None,
            clue_number: None,
            question_id: None,
            current_prompt: None,
            progress_fraction: None,
            awaiting_stop: false,
            total_elapsed_seconds: None,
            total_display: None,
            ran_out_of_time: None,
        };

        match view.screen {
            Screen::Start => {}
            Screen::Active => {
                let elapsed = session.elapsed_seconds(now);
                view.elapsed_seconds = Some(elapsed);
                view.elapsed_display = Some(format_elapsed(elapsed));
                view.clue_number = Some(session.current_step + 1);
                view.progress_fraction = Some(session.current_step as f64 / count as f64);

                if let Some(id) = session.question_order.get(session.current_step).copied() {
                    view.question_id = Some(id);
                    view.current_prompt = bank.get(id).map(|q| q.prompt.clone());
                }
            }
            Screen::End => {
                view.awaiting_stop = session.end_time.is_none();
                view.progress_fraction = Some(1.0);
                if let Some(total) = session.total_elapsed_seconds {
                    view.total_elapsed_seconds = Some(total);
                    view.total_display = Some(format_elapsed(total));
                    view.ran_out_of_time = Some(total >= time_limit as f64);
                }
            }
        }

        view
    }
}

/// Screen selection, in priority order.
fn select_screen(session: &HuntSession, question_count: usize) -> Screen {
    if session.total_elapsed_seconds.is_some() || session.end_time.is_some() {
        Screen::End
    } else if !session.is_running {
        Screen::Start
    } else if session.current_step >= question_count {
        Screen::End
    } else {
        Screen::Active
    }
}
