use std::time::Duration;

use anyhow::{Context, Result};

use crate::locale::Language;

/// Client configuration loaded from environment variables.
/// Fails at startup if the backend base URL is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: Duration,
    /// Delay between the session-expired notice and the redirect home.
    pub session_expiry_redirect: Duration,
    pub payment_simulation: Duration,
    pub default_language: Language,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base_url: require_env("API_BASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            request_timeout: Duration::from_secs(parse_env("REQUEST_TIMEOUT_SECS", 30)?),
            session_expiry_redirect: Duration::from_millis(parse_env(
                "SESSION_EXPIRY_REDIRECT_MS",
                2000,
            )?),
            payment_simulation: Duration::from_millis(parse_env("PAYMENT_SIMULATION_MS", 1500)?),
            default_language: std::env::var("DEFAULT_LANGUAGE")
                .unwrap_or_else(|_| "en".to_string())
                .parse::<Language>()
                .context("DEFAULT_LANGUAGE must be a supported language code")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Configuration pointing at an explicit backend, with every other knob defaulted.
    pub fn with_base_url(api_base_url: impl Into<String>) -> Self {
        Config {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(30),
            session_expiry_redirect: Duration::from_millis(2000),
            payment_simulation: Duration::from_millis(1500),
            default_language: Language::En,
            rust_log: "info".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{key} must be a non-negative integer")),
        Err(_) => Ok(default),
    }
}
