//! HTTP rewrite backend for OpenAI-compatible chat-completions endpoints.
//!
//! Retries on 429 and 5xx with exponential backoff, surfaces other failures
//! as typed errors, and tolerates models that wrap their JSON in code fences.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::llm::prompts::{build_rewrite_prompt, REWRITE_SYSTEM};
use crate::llm::{
    validate_results, BulletRewriteRequest, BulletRewriteResult, BulletRewriter, RewriteError,
};

const MAX_RETRIES: u32 = 3;

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RewritePayload {
    pub(crate) results: Vec<BulletRewriteResult>,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

pub struct HttpRewriter {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpRewriter {
    pub fn new(
        base_url: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
            model,
            api_key,
        }
    }

    async fn call(&self, prompt: &str) -> Result<String, RewriteError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: REWRITE_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };
        let endpoint = build_chat_endpoint(&self.base_url);

        let mut last_error: Option<RewriteError> = None;
        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "rewrite call failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.post(&endpoint).json(&body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }
            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    last_error = Some(RewriteError::Http(err));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                warn!(status = status.as_u16(), "rewrite endpoint returned retryable status");
                last_error = Some(RewriteError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(RewriteError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: ChatResponse = response.json().await?;
            let content = parsed
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .filter(|content| !content.trim().is_empty())
                .ok_or(RewriteError::EmptyContent)?;
            debug!(bytes = content.len(), "rewrite call succeeded");
            return Ok(content);
        }

        Err(last_error.unwrap_or(RewriteError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl BulletRewriter for HttpRewriter {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn rewrite_bullets(
        &self,
        items: &[BulletRewriteRequest],
        instructions: Option<&str>,
    ) -> Result<Vec<BulletRewriteResult>, RewriteError> {
        if items.is_empty() {
            return Ok(vec![]);
        }
        let prompt = build_rewrite_prompt(items, instructions);
        let content = self.call(&prompt).await?;
        let payload: RewritePayload = serde_json::from_str(strip_json_fences(&content))?;
        validate_results(items, &payload.results)?;
        Ok(payload.results)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared wire helpers (also used by the manual backend)
// ────────────────────────────────────────────────────────────────────────────

/// `{base_url}/chat/completions`, tolerating a trailing slash.
pub(crate) fn build_chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Strips ```json ... ``` or ``` ... ``` fences from model output.
pub(crate) fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or_else(|| stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or_else(|| stripped.trim_start())
    } else {
        text
    }
}

/// Pulls the first choice's message content out of an OpenAI-style chat
/// envelope, if `value` is one.
pub(crate) fn extract_chat_content(value: &Value) -> Option<String> {
    value
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}
