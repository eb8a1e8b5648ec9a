//! No-op rewrite backend: returns every bullet unchanged.

use async_trait::async_trait;

use crate::llm::{BulletRewriteRequest, BulletRewriteResult, BulletRewriter, RewriteError};

pub struct NoopRewriter;

#[async_trait]
impl BulletRewriter for NoopRewriter {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn rewrite_bullets(
        &self,
        items: &[BulletRewriteRequest],
        _instructions: Option<&str>,
    ) -> Result<Vec<BulletRewriteResult>, RewriteError> {
        Ok(items
            .iter()
            .map(|item| BulletRewriteResult {
                item_id: item.item_id.clone(),
                bullets: item.bullets.clone(),
            })
            .collect())
    }
}
