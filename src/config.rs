// src/config.rs

use std::env;
use std::net::SocketAddr;

use dotenvy::dotenv;

/// Hard cap on the length of a hunt, in seconds (one hour).
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 3600;

/// How often the active page polls the server to refresh the clock.
pub const REFRESH_INTERVAL_SECS: u64 = 1;

/// How often the sweeper looks for idle sessions.
pub const SWEEP_INTERVAL_SECS: u64 = 60;

pub const SESSION_COOKIE: &str = "hunt_session";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub session_secret: String,
    /// Lifetime of a session cookie, and idle time before a session is purged.
    pub session_ttl: u64,
    pub time_limit: u64,
    pub title: String,
    pub questions_path: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let bind_addr = env::var("HUNT_BIND_ADDR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let session_secret = env::var("HUNT_SESSION_SECRET")
            .expect("HUNT_SESSION_SECRET must be set");

        let session_ttl = env::var("HUNT_SESSION_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(4 * 3600);

        let time_limit = env::var("HUNT_TIME_LIMIT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIME_LIMIT_SECS);

        let title = env::var("HUNT_TITLE")
            .unwrap_or_else(|_| "DTSS College Treasure Hunt".to_string());

        let questions_path = env::var("HUNT_QUESTIONS_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            bind_addr,
            session_secret,
            session_ttl,
            time_limit,
            title,
            questions_path,
            rust_log,
        }
    }
}
