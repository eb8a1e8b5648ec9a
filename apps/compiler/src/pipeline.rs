//! Build orchestration: lint inputs, select, optionally rewrite, compose,
//! paginate, lint output.
//!
//! The rewrite step runs under a caller-supplied timeout and can only swap
//! bullet text wholesale after shape validation; any failure, timeout, or
//! shape mismatch degrades to the original bullets with a warning issue.
//! With no rewriter the whole build is pure and deterministic.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::lint::{codes, has_errors, lint_inputs, lint_output, LintIssue};
use crate::llm::{validate_results, BulletRewriteRequest, BulletRewriteResult, BulletRewriter};
use crate::models::job::JobSpec;
use crate::models::records::CanonicalData;
use crate::render::paged::{paginate, PageMetrics, RenderedDocument};
use crate::render::markdown::compose;
use crate::select::keywords::job_keywords;
use crate::select::{select, SelectionResult};

pub struct BuildRequest<'a> {
    pub data: CanonicalData,
    pub job: Option<JobSpec>,
    pub rewriter: Option<&'a dyn BulletRewriter>,
    pub rewrite_timeout: Duration,
    pub instructions: Option<String>,
    pub page: PageMetrics,
}

impl BuildRequest<'_> {
    /// A plain deterministic build: no rewriter, default page shape.
    pub fn plain(data: CanonicalData, job: Option<JobSpec>) -> Self {
        BuildRequest {
            data,
            job,
            rewriter: None,
            rewrite_timeout: Duration::from_secs(60),
            instructions: None,
            page: PageMetrics::default(),
        }
    }
}

/// Everything a build produces. `markdown`/`document` are absent when
/// error-severity input issues stopped the build before composing.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutcome {
    pub markdown: Option<String>,
    pub document: Option<RenderedDocument>,
    pub selection: SelectionResult,
    pub issues: Vec<LintIssue>,
}

pub async fn build(request: BuildRequest<'_>) -> Result<BuildOutcome, AppError> {
    let BuildRequest {
        data,
        job,
        rewriter,
        rewrite_timeout,
        instructions,
        page,
    } = request;

    let mut issues = lint_inputs(&data);
    let selection = select(&data, job.as_ref());

    if has_errors(&issues) {
        warn!(
            issues = issues.len(),
            "input lint reported errors; stopping before composition"
        );
        return Ok(BuildOutcome {
            markdown: None,
            document: None,
            selection,
            issues,
        });
    }

    let data = match rewriter {
        Some(rewriter) => {
            rewrite_selected(
                data,
                &selection,
                job.as_ref(),
                rewriter,
                rewrite_timeout,
                instructions.as_deref(),
                &mut issues,
            )
            .await
        }
        None => data,
    };

    let markdown = compose(&data, &selection)?;
    let document = paginate(&markdown, &page);
    issues.extend(lint_output(&markdown));
    debug!(
        pages = document.pages.len(),
        issues = issues.len(),
        "build complete"
    );

    Ok(BuildOutcome {
        markdown: Some(markdown),
        document: Some(document),
        selection,
        issues,
    })
}

/// Offers the selected entries' bullets to the rewriter. Keeps the original
/// data untouched unless a shape-valid result arrives within the timeout.
async fn rewrite_selected(
    data: CanonicalData,
    selection: &SelectionResult,
    job: Option<&JobSpec>,
    rewriter: &dyn BulletRewriter,
    timeout: Duration,
    instructions: Option<&str>,
    issues: &mut Vec<LintIssue>,
) -> CanonicalData {
    let keywords: Vec<String> = job
        .map(|j| job_keywords(j).into_iter().collect())
        .unwrap_or_default();

    let mut items: Vec<BulletRewriteRequest> = Vec::new();
    for id in &selection.selected_experience {
        if let Some(entry) = data.experience.iter().find(|e| &e.id == id) {
            items.push(BulletRewriteRequest {
                item_id: entry.id.clone(),
                bullets: entry.bullets.clone(),
                job_keywords: keywords.clone(),
            });
        }
    }
    for id in &selection.selected_projects {
        if let Some(entry) = data.projects.iter().find(|p| &p.id == id) {
            items.push(BulletRewriteRequest {
                item_id: entry.id.clone(),
                bullets: entry.bullets.clone(),
                job_keywords: keywords.clone(),
            });
        }
    }
    if items.is_empty() {
        return data;
    }

    match tokio::time::timeout(timeout, rewriter.rewrite_bullets(&items, instructions)).await {
        Err(_) => {
            warn!(backend = rewriter.name(), timeout_secs = timeout.as_secs(), "rewrite timed out");
            issues.push(LintIssue::warning(
                codes::LLM_REWRITE_TIMEOUT,
                format!(
                    "rewrite backend `{}` exceeded {}s; keeping original bullets",
                    rewriter.name(),
                    timeout.as_secs()
                ),
                None,
            ));
            data
        }
        Ok(Err(err)) => {
            warn!(backend = rewriter.name(), error = %err, "rewrite failed");
            issues.push(LintIssue::warning(
                codes::LLM_REWRITE_FAILED,
                format!(
                    "rewrite backend `{}` failed ({err}); keeping original bullets",
                    rewriter.name()
                ),
                None,
            ));
            data
        }
        Ok(Ok(results)) => match validate_results(&items, &results) {
            Err(err) => {
                issues.push(LintIssue::warning(
                    codes::LLM_REWRITE_FAILED,
                    format!(
                        "rewrite backend `{}` returned a mismatched shape ({err}); keeping original bullets",
                        rewriter.name()
                    ),
                    None,
                ));
                data
            }
            Ok(()) => apply_rewrites(data, &results),
        },
    }
}

/// Replaces bullets of rewritten entries, leaving everything else untouched.
pub(crate) fn apply_rewrites(
    mut data: CanonicalData,
    results: &[BulletRewriteResult],
) -> CanonicalData {
    let by_id: HashMap<&str, &Vec<String>> = results
        .iter()
        .map(|result| (result.item_id.as_str(), &result.bullets))
        .collect();
    for entry in &mut data.experience {
        if let Some(bullets) = by_id.get(entry.id.as_str()) {
            entry.bullets = (*bullets).clone();
        }
    }
    for entry in &mut data.projects {
        if let Some(bullets) = by_id.get(entry.id.as_str()) {
            entry.bullets = (*bullets).clone();
        }
    }
    data
}

/// Output stem for a build artifact: `cv_generic` or `cv_<sanitized-job-id>`.
pub fn output_stem(job: Option<&JobSpec>) -> String {
    match job {
        None => "cv_generic".to_string(),
        Some(job) => format!("cv_{}", sanitize_stem(&job.id)),
    }
}

fn sanitize_stem(stem: &str) -> String {
    let safe: String = stem
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = safe.trim_matches('_');
    if trimmed.is_empty() {
        "job".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::Severity;
    use crate::llm::noop::NoopRewriter;
    use crate::llm::RewriteError;
    use crate::models::records::{
        CanonicalData, Education, ExperienceEntry, Profile, Skills,
    };
    use async_trait::async_trait;

    fn make_data() -> CanonicalData {
        CanonicalData {
            profile: Profile {
                id: "profile".to_string(),
                name: "Ada Lovelace".to_string(),
                headline: "Engineer".to_string(),
                location: "London".to_string(),
                email: None,
                links: vec![],
                about_me: String::new(),
                source: None,
            },
            experience: vec![ExperienceEntry {
                id: "acme".to_string(),
                company: "Acme".to_string(),
                title: "Engineer".to_string(),
                location: None,
                start_date: "2020-01".to_string(),
                end_date: None,
                tags: vec!["rust".to_string()],
                bullets: vec!["Built the pipeline".to_string()],
                importance: None,
                source: None,
            }],
            projects: vec![],
            skills: Skills {
                id: "skills".to_string(),
                categories: vec![],
                source: None,
            },
            education: None::<Education>,
        }
    }

    struct SlowRewriter;

    #[async_trait]
    impl BulletRewriter for SlowRewriter {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn rewrite_bullets(
            &self,
            items: &[BulletRewriteRequest],
            _instructions: Option<&str>,
        ) -> Result<Vec<BulletRewriteResult>, RewriteError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(items
                .iter()
                .map(|item| BulletRewriteResult {
                    item_id: item.item_id.clone(),
                    bullets: item.bullets.clone(),
                })
                .collect())
        }
    }

    struct MangledRewriter;

    #[async_trait]
    impl BulletRewriter for MangledRewriter {
        fn name(&self) -> &'static str {
            "mangled"
        }

        async fn rewrite_bullets(
            &self,
            _items: &[BulletRewriteRequest],
            _instructions: Option<&str>,
        ) -> Result<Vec<BulletRewriteResult>, RewriteError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_plain_build_produces_document_and_no_errors() {
        let outcome = build(BuildRequest::plain(make_data(), None)).await.unwrap();
        let markdown = outcome.markdown.expect("markdown present");
        assert!(markdown.contains("# Ada Lovelace"));
        assert!(markdown.contains("### Engineer - Acme"));
        assert!(outcome.document.is_some());
        assert!(!has_errors(&outcome.issues));
        assert_eq!(outcome.selection.selected_experience, vec!["acme"]);
    }

    #[tokio::test]
    async fn test_build_is_deterministic() {
        let first = build(BuildRequest::plain(make_data(), None)).await.unwrap();
        let second = build(BuildRequest::plain(make_data(), None)).await.unwrap();
        assert_eq!(first.markdown, second.markdown);
        assert_eq!(first.selection, second.selection);
    }

    #[tokio::test]
    async fn test_input_errors_stop_before_composition() {
        let mut data = make_data();
        data.experience[0].start_date = "whenever".to_string();
        let outcome = build(BuildRequest::plain(data, None)).await.unwrap();
        assert!(outcome.markdown.is_none());
        assert!(outcome.document.is_none());
        assert!(has_errors(&outcome.issues));
        // selection still ran, for explainability
        assert_eq!(outcome.selection.decisions.len(), 1);
    }

    #[tokio::test]
    async fn test_noop_rewriter_leaves_output_identical() {
        let rewriter = NoopRewriter;
        let mut request = BuildRequest::plain(make_data(), None);
        request.rewriter = Some(&rewriter);
        let with_noop = build(request).await.unwrap();
        let without = build(BuildRequest::plain(make_data(), None)).await.unwrap();
        assert_eq!(with_noop.markdown, without.markdown);
        assert!(!with_noop
            .issues
            .iter()
            .any(|i| i.code == codes::LLM_REWRITE_FAILED));
    }

    #[tokio::test]
    async fn test_rewrite_timeout_degrades_with_warning() {
        let rewriter = SlowRewriter;
        let mut request = BuildRequest::plain(make_data(), None);
        request.rewriter = Some(&rewriter);
        request.rewrite_timeout = Duration::from_millis(50);
        let outcome = build(request).await.unwrap();
        let issue = outcome
            .issues
            .iter()
            .find(|i| i.code == codes::LLM_REWRITE_TIMEOUT)
            .expect("timeout warning");
        assert_eq!(issue.severity, Severity::Warning);
        // original bullets survive
        assert!(outcome.markdown.unwrap().contains("Built the pipeline"));
    }

    #[tokio::test]
    async fn test_shape_mismatch_degrades_with_warning() {
        let rewriter = MangledRewriter;
        let mut request = BuildRequest::plain(make_data(), None);
        request.rewriter = Some(&rewriter);
        let outcome = build(request).await.unwrap();
        assert!(outcome
            .issues
            .iter()
            .any(|i| i.code == codes::LLM_REWRITE_FAILED));
        assert!(outcome.markdown.unwrap().contains("Built the pipeline"));
    }

    #[tokio::test]
    async fn test_empty_dataset_builds_header_only_document() {
        let mut data = make_data();
        data.experience.clear();
        let outcome = build(BuildRequest::plain(data, None)).await.unwrap();
        let markdown = outcome.markdown.expect("markdown present");
        assert!(markdown.starts_with("# Ada Lovelace"));
        assert!(!markdown.contains("## Experience"));
        assert!(!has_errors(&outcome.issues));
        assert!(outcome
            .issues
            .iter()
            .any(|i| i.code == codes::NO_EXPERIENCE));
    }

    #[test]
    fn test_apply_rewrites_replaces_only_matched_entries() {
        let data = make_data();
        let results = vec![BulletRewriteResult {
            item_id: "acme".to_string(),
            bullets: vec!["Shipped the pipeline to production".to_string()],
        }];
        let rewritten = apply_rewrites(data, &results);
        assert_eq!(
            rewritten.experience[0].bullets,
            vec!["Shipped the pipeline to production"]
        );
    }

    #[test]
    fn test_output_stem_naming() {
        assert_eq!(output_stem(None), "cv_generic");
        let job = JobSpec {
            id: "Backend Engineer @ Acme!".to_string(),
            title: None,
            raw_text: String::new(),
            keywords: vec![],
            source: None,
        };
        assert_eq!(output_stem(Some(&job)), "cv_Backend_Engineer___Acme");
    }
}
