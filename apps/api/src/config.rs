use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a sensible local-development default, so a bare
/// `cargo run` talks to an Ollama instance on localhost.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Ollama backend, e.g. `http://localhost:11434`.
    pub ollama_host: String,
    /// Model used for every generation call in the engine.
    pub model: String,
    /// Per-request timeout for generation calls, in seconds.
    pub request_timeout_secs: u64,
    /// Attempts allowed for the startup model-availability check.
    pub availability_retries: u32,
    /// Fixed delay between availability attempts, in seconds.
    pub availability_delay_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            ollama_host: env_or("OLLAMA_HOST", "http://localhost:11434"),
            model: env_or("INTERVIEW_MODEL", "mistral-small-24b"),
            request_timeout_secs: env_or("LLM_TIMEOUT_SECS", "60")
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a number of seconds")?,
            availability_retries: env_or("MODEL_CHECK_RETRIES", "5")
                .parse::<u32>()
                .context("MODEL_CHECK_RETRIES must be a number")?,
            availability_delay_secs: env_or("MODEL_CHECK_DELAY_SECS", "5")
                .parse::<u64>()
                .context("MODEL_CHECK_DELAY_SECS must be a number of seconds")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
