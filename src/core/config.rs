//! Environment-backed runtime configuration.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default chat model when OPENAI_MODEL is not set
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default timeout for persona derivation and reply generation
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default opening line seeded into a fresh debate
pub const DEFAULT_OPENING_LINE: &str = "Hi there! Nice to meet you.";

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key (required)
    pub openai_api_key: String,
    /// Chat model used for derivation and replies
    pub openai_model: String,
    /// Timeout applied to every external model call
    pub request_timeout: Duration,
    /// Optional delay between the two turns of a debate exchange.
    /// Display pacing only; off by default.
    pub debate_pacing: Option<Duration>,
    /// Line attributed to the first debater when a debate is (re)seeded
    pub opening_line: String,
    /// Default env_logger filter
    pub log_level: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Only `OPENAI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable is required")?;

        let openai_model =
            env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let request_timeout_secs = env::var("STUDIO_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        // 0 disables pacing entirely
        let debate_pacing = env::var("STUDIO_DEBATE_PACING_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);

        let opening_line = env::var("STUDIO_OPENING_LINE")
            .unwrap_or_else(|_| DEFAULT_OPENING_LINE.to_string());

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            openai_api_key,
            openai_model,
            request_timeout: Duration::from_secs(request_timeout_secs),
            debate_pacing,
            opening_line,
            log_level,
        })
    }
}
