use anyhow::{bail, Context, Result};

use crate::document::doc_intel;
use crate::llm_client;

/// Document Intelligence credentials. Present only when both are set.
#[derive(Debug, Clone)]
pub struct DocIntelConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub llm_api_key: String,
    pub llm_api_url: String,
    pub llm_model: String,
    pub llm_max_attempts: u32,
    pub llm_extraction_enabled: bool,
    pub doc_intel: Option<DocIntelConfig>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let doc_intel = match (optional_env("DOC_INTEL_ENDPOINT"), optional_env("DOC_INTEL_KEY")) {
            (Some(endpoint), Some(api_key)) => Some(DocIntelConfig {
                endpoint,
                api_key,
                model: optional_env("DOC_INTEL_MODEL")
                    .unwrap_or_else(|| doc_intel::DEFAULT_MODEL.to_string()),
            }),
            (None, None) => None,
            _ => bail!("DOC_INTEL_ENDPOINT and DOC_INTEL_KEY must be set together"),
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_api_url: optional_env("LLM_API_URL")
                .unwrap_or_else(|| llm_client::DEFAULT_API_URL.to_string()),
            llm_model: optional_env("LLM_MODEL")
                .unwrap_or_else(|| llm_client::DEFAULT_MODEL.to_string()),
            llm_max_attempts: optional_env("LLM_MAX_ATTEMPTS")
                .unwrap_or_else(|| "3".to_string())
                .parse::<u32>()
                .context("LLM_MAX_ATTEMPTS must be a positive integer")?,
            llm_extraction_enabled: parse_bool(
                "LLM_EXTRACTION_ENABLED",
                optional_env("LLM_EXTRACTION_ENABLED").as_deref(),
                true,
            )?,
            doc_intel,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank are the same thing.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(key: &str, value: Option<&str>, default: bool) -> Result<bool> {
    match value.map(|v| v.trim().to_lowercase()).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => bail!("{key} must be a boolean, got '{other}'"),
    }
}
