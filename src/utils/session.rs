// src/utils/session.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::SESSION_COOKIE, error::AppError, state::AppState};

/// Session cookie claims.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the session id.
    pub sub: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Identity of the hunt session attached to the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

/// Signs a session token valid for `ttl_seconds`.
pub fn sign_session_token(id: Uuid, secret: &str, ttl_seconds: u64) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + ttl_seconds as usize;

    let claims = Claims {
        sub: id.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies a session token and returns the session id it names.
pub fn verify_session_token(token: &str, secret: &str) -> Result<Uuid, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid session".to_string()))?;

    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid session".to_string()))
}

/// Finds a cookie value by name across all `Cookie` headers.
fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Axum Middleware: Session identity.
///
/// Resolves the `hunt_session` cookie to a live session and injects
/// `SessionId` into the request extensions. Requests without a valid cookie,
/// or whose session was purged, get a brand new session and a `Set-Cookie`.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let secret = &state.config.session_secret;

    let mut existing = read_cookie(req.headers(), SESSION_COOKIE)
        .and_then(|token| verify_session_token(token, secret).ok());
    if let Some(id) = existing {
        if !state.sessions.contains(id).await {
            tracing::debug!(session = %id, "Session expired, issuing a new one");
            existing = None;
        }
    }

    let (id, issued) = match existing {
        Some(id) => (id, None),
        None => {
            let id = state.sessions.create(Utc::now()).await;
            let token = sign_session_token(id, secret, state.config.session_ttl)?;
            (id, Some(token))
        }
    };

    req.extensions_mut().insert(SessionId(id));
    let mut response = next.run(req).await;

    if let Some(token) = issued {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE, token, state.config.session_ttl
        );
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        response.headers_mut().append(header::SET_COOKIE, value);
    }

    Ok(response)
}
