// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{hunt, page},
    state::AppState,
    utils::session::session_middleware,
};

/// Assembles the main application router.
///
/// * HTML page and its form actions at the root.
/// * JSON API under `/api/hunt`.
/// * Every hunt route runs behind the session cookie middleware.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_credentials(true);

    let page_routes = Router::new()
        .route("/", get(page::show_page))
        .route("/start", post(page::start_form))
        .route("/answer", post(page::answer_form))
        .route("/stop", post(page::stop_form));

    let hunt_routes = Router::new()
        .route("/start", post(hunt::start_hunt))
        .route("/answer", post(hunt::submit_answer))
        .route("/stop", post(hunt::stop_timer))
        .route("/view", get(hunt::get_view));

    let session_routes = Router::new()
        .merge(page_routes)
        .nest("/api/hunt", hunt_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .merge(session_routes)
        .route("/api/health", get(hunt::health))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
