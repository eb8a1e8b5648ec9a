//! Manual/offline rewrite backend.
//!
//! Writes an OpenAI-compatible request payload to disk for the user to run
//! through whatever model they have access to, then reads the pasted response
//! file. The response may be the raw chat envelope or just the inner JSON.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::llm::http::{extract_chat_content, strip_json_fences, RewritePayload};
use crate::llm::prompts::{build_rewrite_prompt, REWRITE_SYSTEM};
use crate::llm::{
    validate_results, BulletRewriteRequest, BulletRewriteResult, BulletRewriter, RewriteError,
};

pub struct ManualRewriter {
    request_path: PathBuf,
    response_path: PathBuf,
    model: String,
}

impl ManualRewriter {
    /// Exchange files live in `dir`: `llm_rewrite_request.json` is written,
    /// `llm_rewrite_response.json` is expected back.
    pub fn new(dir: &Path) -> Self {
        Self {
            request_path: dir.join("llm_rewrite_request.json"),
            response_path: dir.join("llm_rewrite_response.json"),
            model: "manual".to_string(),
        }
    }
}

#[async_trait]
impl BulletRewriter for ManualRewriter {
    fn name(&self) -> &'static str {
        "manual"
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
        let payload = json!({
            "payload": {
                "model": self.model,
                "messages": [
                    {"role": "system", "content": REWRITE_SYSTEM},
                    {"role": "user", "content": prompt},
                ],
            }
        });
        if let Some(parent) = self.request_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(
            &self.request_path,
            serde_json::to_string_pretty(&payload)? + "\n",
        )?;
        info!(path = %self.request_path.display(), "wrote rewrite request payload");

        if !self.response_path.exists() {
            return Err(RewriteError::ResponseMissing(self.response_path.clone()));
        }
        let raw = std::fs::read_to_string(&self.response_path)?;
        let content = extract_response_content(&raw);
        let payload: RewritePayload = serde_json::from_str(strip_json_fences(&content))?;
        validate_results(items, &payload.results)?;
        Ok(payload.results)
    }
}

/// Accepts either a chat envelope, an object with a top-level `content`
/// string, or the bare results JSON.
fn extract_response_content(raw: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        return raw.to_string();
    };
    if let Some(content) = extract_chat_content(&value) {
        return content;
    }
    if let Some(content) = value.get("content").and_then(|c| c.as_str()) {
        return content.to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_items() -> Vec<BulletRewriteRequest> {
        vec![BulletRewriteRequest {
            item_id: "acme".to_string(),
            bullets: vec!["Built the pipeline".to_string()],
            job_keywords: vec!["rust".to_string()],
        }]
    }

    #[tokio::test]
    async fn test_missing_response_writes_request_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let rewriter = ManualRewriter::new(dir.path());
        let err = rewriter.rewrite_bullets(&make_items(), None).await.unwrap_err();
        assert!(matches!(err, RewriteError::ResponseMissing(_)));

        let request = std::fs::read_to_string(dir.path().join("llm_rewrite_request.json")).unwrap();
        assert!(request.contains("Built the pipeline"));
        assert!(request.contains("\"model\""));
    }

    #[tokio::test]
    async fn test_reads_bare_results_response() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("llm_rewrite_response.json"),
            "{\"results\": [{\"item_id\": \"acme\", \"bullets\": [\"Shipped the pipeline\"]}]}",
        )
        .unwrap();
        let rewriter = ManualRewriter::new(dir.path());
        let results = rewriter.rewrite_bullets(&make_items(), None).await.unwrap();
        assert_eq!(results[0].bullets, vec!["Shipped the pipeline"]);
    }

    #[tokio::test]
    async fn test_reads_chat_envelope_response() {
        let dir = tempfile::tempdir().unwrap();
        let envelope = serde_json::json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": "```json\n{\"results\": [{\"item_id\": \"acme\", \"bullets\": [\"Drove the pipeline\"]}]}\n```"
            }}]
        });
        std::fs::write(
            dir.path().join("llm_rewrite_response.json"),
            serde_json::to_string(&envelope).unwrap(),
        )
        .unwrap();
        let rewriter = ManualRewriter::new(dir.path());
        let results = rewriter.rewrite_bullets(&make_items(), None).await.unwrap();
        assert_eq!(results[0].bullets, vec!["Drove the pipeline"]);
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("llm_rewrite_response.json"),
            "{\"results\": [{\"item_id\": \"other\", \"bullets\": [\"x\"]}]}",
        )
        .unwrap();
        let rewriter = ManualRewriter::new(dir.path());
        let err = rewriter.rewrite_bullets(&make_items(), None).await.unwrap_err();
        assert!(matches!(err, RewriteError::CountMismatch(_)));
    }
}
