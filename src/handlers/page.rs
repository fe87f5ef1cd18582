// src/handlers/page.rs

use axum::{
    Extension, Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect},
};

use super::hunt;
use crate::{
    config::REFRESH_INTERVAL_SECS,
    error::AppError,
    hunt::{Screen, ViewModel},
    models::hunt::{PageParams, SubmitAnswerRequest},
    state::AppState,
    utils::{html::escape_text, session::SessionId},
};

/// Polls the view once per tick while the hunt is active. The interval is
/// cleared as soon as the server reports another screen or another clue.
const REFRESH_SCRIPT: &str = r#"<script>
(function () {
  var main = document.getElementById('hunt');
  var question = main.getAttribute('data-question');
  var timer = setInterval(function () {
    fetch('/api/hunt/view', { credentials: 'same-origin' })
      .then(function (res) { return res.json(); })
      .then(function (view) {
        if (view.screen !== 'active' || String(view.question_id) !== question) {
          clearInterval(timer);
          window.location.replace('/');
          return;
        }
        document.getElementById('elapsed').textContent = view.elapsed_display;
      })
      .catch(function () {});
  }, __INTERVAL_MS__);
})();
</script>"#;

/// Renders the Start, Active or End screen for the caller's session.
pub async fn show_page(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let view = hunt::current_view(&state, id).await?;
    let failed = params.result.as_deref() == Some("wrong");
    Ok(Html(render_page(&state.config.title, &view, failed)))
}

/// Form action of the start button.
pub async fn start_form(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> Result<impl IntoResponse, AppError> {
    ignore_conflict(hunt::start(&state, id).await)?;
    Ok(Redirect::to("/"))
}

/// Form action of the answer box.
pub async fn answer_form(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Form(req): Form<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let accepted = match hunt::answer(&state, id, &req).await {
        Ok(res) => res.accepted,
        // Oversized input is just another wrong answer on the page.
        Err(AppError::BadRequest(_)) => false,
        Err(e) => return Err(e),
    };

    Ok(Redirect::to(if accepted { "/" } else { "/?result=wrong" }))
}

/// Form action of the stop button.
pub async fn stop_form(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> Result<impl IntoResponse, AppError> {
    ignore_conflict(hunt::stop(&state, id).await)?;
    Ok(Redirect::to("/"))
}

/// Double-clicked or stale buttons fall back to re-rendering the current screen.
fn ignore_conflict<T>(result: Result<T, AppError>) -> Result<(), AppError> {
    match result {
        Ok(_) => Ok(()),
        Err(AppError::Conflict(msg)) => {
            tracing::debug!("Ignoring stale form action: {}", msg);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

pub fn render_page(title: &str, view: &ViewModel, failed: bool) -> String {
    let title = escape_text(title);
    let body = match view.screen {
        Screen::Start => render_start(view),
        Screen::Active => render_active(view, failed),
        Screen::End => render_end(view),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n</head>\n<body>\n\
         <h1 style=\"text-align: center;\">{title}</h1>\n{body}\n</body>\n</html>\n"
    )
}

fn render_start(view: &ViewModel) -> String {
    let minutes = view.time_limit_seconds / 60;
    format!(
        "<main id=\"hunt\" data-screen=\"start\">\n\
         <h2>Welcome, Treasure Hunter!</h2>\n\
         <p>Get ready for an exciting adventure across campus. \
         Start the timer to receive your first clue.</p>\n\
         <p class=\"info\">You will have <strong>{minutes} minutes</strong> to complete the hunt. Good luck!</p>\n\
         <form method=\"post\" action=\"/start\">\n\
         <button type=\"submit\">Start the Hunt!</button>\n\
         </form>\n</main>"
    )
}

fn render_active(view: &ViewModel, failed: bool) -> String {
    let question = view
        .question_id
        .map(|id| id.to_string())
        .unwrap_or_default();
    let clue = view.clue_number.unwrap_or(1);
    let prompt = escape_text(view.current_prompt.as_deref().unwrap_or_default());
    let elapsed = view.elapsed_display.as_deref().unwrap_or("0:00:00");
    let progress = view.progress_fraction.unwrap_or_default();
    let error = if failed {
        "<p class=\"error\" role=\"alert\">That is not the right answer. Try again.</p>\n"
    } else {
        ""
    };
    let script = REFRESH_SCRIPT.replace(
        "__INTERVAL_MS__",
        &(REFRESH_INTERVAL_SECS * 1000).to_string(),
    );

    format!(
        "<main id=\"hunt\" data-screen=\"active\" data-question=\"{question}\">\n\
         <p>Time Elapsed: <strong id=\"elapsed\">{elapsed}</strong></p>\n\
         <p>Your Progress: <progress value=\"{progress:.3}\" max=\"1\"></progress></p>\n\
         <hr>\n\
         <h2>Clue #{clue}</h2>\n\
         <p><strong>{prompt}</strong></p>\n\
         {error}\
         <form method=\"post\" action=\"/answer\">\n\
         <input type=\"hidden\" name=\"question_id\" value=\"{question}\">\n\
         <label>Your Answer: <input type=\"text\" name=\"answer\" autocomplete=\"off\" \
         placeholder=\"Type your answer here...\" autofocus></label>\n\
         <button type=\"submit\">Submit Answer</button>\n\
         </form>\n</main>\n{script}"
    )
}

fn render_end(view: &ViewModel) -> String {
    let mut html = String::from(
        "<main id=\"hunt\" data-screen=\"end\">\n<h2>This is the end!</h2>\n\
         <p><strong>Please stop the timer only at the location instructed by the volunteers.</strong></p>\n",
    );

    if view.awaiting_stop {
        if view.ran_out_of_time == Some(true) {
            html.push_str("<p class=\"warning\">Time's up! The hunt is over.</p>\n");
        }
        html.push_str(
            "<form method=\"post\" action=\"/stop\">\n\
             <button type=\"submit\">Stop Timer and See Your Result</button>\n</form>\n",
        );
    } else {
        let total = view.total_display.as_deref().unwrap_or("0:00:00");
        html.push_str("<p class=\"success\">Congratulations! You've completed the Treasure Hunt.</p>\n");
        html.push_str(&format!("<p>Your Total Time: <strong id=\"total\">{}</strong></p>\n", total));
        if view.ran_out_of_time == Some(true) {
            html.push_str("<p class=\"warning\">You ran out of time, but great effort!</p>\n");
        } else {
            html.push_str("<p class=\"info\">Well done on completing the hunt within the time limit!</p>\n");
        }
    }

    html.push_str("</main>");
    html
}
