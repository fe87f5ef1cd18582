use std::sync::Arc;

use crate::config::Config;
use crate::hunt::{QuestionBank, SessionStore};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub bank: Arc<QuestionBank>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, bank: QuestionBank) -> Self {
        Self {
            sessions: SessionStore::new(),
            bank: Arc::new(bank),
            config,
        }
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
