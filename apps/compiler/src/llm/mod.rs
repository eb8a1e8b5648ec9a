//! Optional bullet-rewrite capability.
//!
//! A rewriter may rephrase the bullets of already-selected entries against
//! job keywords. It must not invent facts, and it must return the same shape
//! it was given: one result per request item, same ids, same bullet counts.
//! The pipeline verifies that with [`validate_results`] and falls back to the
//! original text on any failure, so a misbehaving backend can never corrupt a
//! build.

pub mod http;
pub mod manual;
pub mod noop;
pub mod prompts;

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One selected entry's bullets, offered for rewriting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletRewriteRequest {
    pub item_id: String,
    pub bullets: Vec<String>,
    pub job_keywords: Vec<String>,
}

/// The rewritten bullets for one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletRewriteResult {
    pub item_id: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("rewrite backend returned empty content")]
    EmptyContent,

    #[error("response file missing: {0} (paste the model output there and retry)")]
    ResponseMissing(PathBuf),

    #[error("rewrite result shape mismatch: {0}")]
    CountMismatch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The rewrite capability. Backends are swapped at the CLI boundary; the
/// pipeline depends only on this trait.
#[async_trait]
pub trait BulletRewriter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Rewrites a batch of bullet groups. Must return one result per item.
    async fn rewrite_bullets(
        &self,
        items: &[BulletRewriteRequest],
        instructions: Option<&str>,
    ) -> Result<Vec<BulletRewriteResult>, RewriteError>;
}

/// Checks that `results` mirrors `items`: same length, same ids in order,
/// same bullet count per item.
pub fn validate_results(
    items: &[BulletRewriteRequest],
    results: &[BulletRewriteResult],
) -> Result<(), RewriteError> {
    if results.len() != items.len() {
        return Err(RewriteError::CountMismatch(format!(
            "expected {} items, got {}",
            items.len(),
            results.len()
        )));
    }
    for (request, result) in items.iter().zip(results) {
        if request.item_id != result.item_id {
            return Err(RewriteError::CountMismatch(format!(
                "expected item `{}`, got `{}`",
                request.item_id, result.item_id
            )));
        }
        if request.bullets.len() != result.bullets.len() {
            return Err(RewriteError::CountMismatch(format!(
                "item `{}`: expected {} bullets, got {}",
                request.item_id,
                request.bullets.len(),
                result.bullets.len()
            )));
        }
    }
    Ok(())
}
