//! Rewrite-provider configuration.
//!
//! Resolved only at the CLI boundary and handed to the pipeline as an
//! already-constructed backend; the core never reads the environment.

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct RewriteConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl RewriteConfig {
    /// Reads `CV_LLM_BASE_URL`, `CV_LLM_MODEL`, `CV_LLM_API_KEY` and
    /// `CV_LLM_TIMEOUT_SECS` (default 60). Returns `None` when the endpoint
    /// is not configured at all; that is a normal, non-LLM run.
    pub fn from_env() -> Result<Option<Self>> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let base_url = std::env::var("CV_LLM_BASE_URL").ok();
        let model = std::env::var("CV_LLM_MODEL").ok();
        let (Some(base_url), Some(model)) = (base_url, model) else {
            return Ok(None);
        };

        let api_key = std::env::var("CV_LLM_API_KEY").ok();
        let timeout_secs = match std::env::var("CV_LLM_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("CV_LLM_TIMEOUT_SECS must be an integer number of seconds")?,
            Err(_) => 60,
        };

        Ok(Some(Self {
            base_url,
            model,
            api_key,
            timeout_secs,
        }))
    }
}
