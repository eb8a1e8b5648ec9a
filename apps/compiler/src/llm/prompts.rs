//! Prompt templates for the rewrite backends.
//!
//! Placeholders are substituted with `.replace`, never interpolated, so the
//! templates stay greppable as complete text.

use crate::llm::BulletRewriteRequest;

pub const REWRITE_SYSTEM: &str = "You rewrite CV bullet points. You never invent facts, numbers, \
employers, or technologies: every statement in a rewritten bullet must be attributable to the \
input bullet it replaces. You respond with JSON only.";

pub const REWRITE_PROMPT_TEMPLATE: &str = r#"Rewrite the bullet points below to be tighter and, where honest, aligned with the job keywords. Rules:
- Return exactly one rewritten group per input item, same item_id, same number of bullets.
- Do not invent facts. Do not add numbers that are not in the original.
- Keep each bullet a single line of plain ASCII text.
{instructions}
Job keywords: {job_keywords}

Input items (JSON):
{items_json}

Respond with JSON of the shape:
{"results": [{"item_id": "...", "bullets": ["..."]}]}"#;

/// Builds the user prompt for a rewrite batch.
pub fn build_rewrite_prompt(
    items: &[BulletRewriteRequest],
    instructions: Option<&str>,
) -> String {
    let job_keywords = items
        .first()
        .map(|item| item.job_keywords.join(", "))
        .filter(|kw| !kw.is_empty())
        .unwrap_or_else(|| "none specified".to_string());
    let items_json =
        serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
    let extra = match instructions {
        Some(text) if !text.trim().is_empty() => format!("- {}\n", text.trim()),
        _ => String::new(),
    };
    REWRITE_PROMPT_TEMPLATE
        .replace("{instructions}", &extra)
        .replace("{job_keywords}", &job_keywords)
        .replace("{items_json}", &items_json)
}
