// src/handlers/hunt.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    hunt::{HuntSession, SessionStore, ViewModel},
    models::hunt::{SubmitAnswerRequest, SubmitAnswerResponse},
    state::AppState,
    utils::session::SessionId,
};

/// Runs `f` against the caller's session, failing if the session vanished.
async fn with_session<F, R>(state: &AppState, id: Uuid, f: F) -> Result<R, AppError>
where
    F: FnOnce(&mut HuntSession) -> R,
{
    state
        .sessions
        .with_session(id, Utc::now(), f)
        .await
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))
}

/// Expiry check followed by a read of the session, as done before every render.
pub(crate) async fn current_view(state: &AppState, id: Uuid) -> Result<ViewModel, AppError> {
    let bank = state.bank.clone();
    let limit = state.config.time_limit;
    let now = Utc::now();

    let (expired, view) = with_session(state, id, |session| {
        let expired = session.check_expiry(bank.len(), limit, now);
        (expired, ViewModel::build(session, &bank, limit, now))
    })
    .await?;

    if expired {
        tracing::info!(session = %id, "Hunt expired after {}s", limit);
    }
    Ok(view)
}

pub(crate) async fn start(state: &AppState, id: Uuid) -> Result<ViewModel, AppError> {
    let bank = state.bank.clone();
    let now = Utc::now();

    with_session(state, id, |session| {
        session.start(&bank, &mut rand::rng(), now)
    })
    .await??;

    tracing::info!(session = %id, "Hunt started");
    current_view(state, id).await
}

pub(crate) async fn answer(
    state: &AppState,
    id: Uuid,
    req: &SubmitAnswerRequest,
) -> Result<SubmitAnswerResponse, AppError> {
    req.validate()?;

    let bank = state.bank.clone();
    let limit = state.config.time_limit;
    let now = Utc::now();

    let outcome = with_session(state, id, |session| {
        session.submit_answer(&bank, req.question_id, &req.answer, limit, now)
    })
    .await?;

    if outcome.accepted {
        tracing::info!(session = %id, step = outcome.current_step, "Answer accepted");
    } else {
        tracing::debug!(session = %id, step = outcome.current_step, "Answer rejected");
    }

    Ok(SubmitAnswerResponse {
        accepted: outcome.accepted,
        current_step: outcome.current_step,
        question_count: bank.len(),
        completed: outcome.completed,
    })
}

pub(crate) async fn stop(state: &AppState, id: Uuid) -> Result<ViewModel, AppError> {
    let bank = state.bank.clone();
    let limit = state.config.time_limit;
    let now = Utc::now();

    let view = with_session(state, id, |session| {
        session
            .stop_timer(bank.len(), now)
            .map(|_| ViewModel::build(session, &bank, limit, now))
    })
    .await??;

    tracing::info!(
        session = %id,
        total = view.total_elapsed_seconds.unwrap_or_default(),
        "Timer stopped"
    );
    Ok(view)
}

/// Starts the hunt for the caller's session.
/// Returns 409 Conflict if this session already started.
pub async fn start_hunt(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(start(&state, id).await?))
}

/// Checks an answer to the current clue.
///
/// A wrong answer is a normal `accepted: false` result, never an error,
/// and the expected answer is never revealed.
pub async fn submit_answer(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(answer(&state, id, &req).await?))
}

/// Stops the timer once every clue is answered.
/// Returns 409 Conflict before that point, or when already stopped.
pub async fn stop_timer(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(stop(&state, id).await?))
}

/// Returns the view model, forcing completion if the time limit passed.
/// Polled once per second by the active page.
pub async fn get_view(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(current_view(&state, id).await?))
}

pub async fn health(State(sessions): State<SessionStore>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "sessions": sessions.len().await,
    }))
}
