//! Output lint: validates a composed or rendered artifact against ATS
//! constraints.

use std::path::Path;

use crate::lint::{codes, LintIssue};
use crate::render::markdown::SECTION_ORDER;
use crate::render::normalize::is_safe_char;

/// HTML fragments that indicate table/column/image constructs.
const STRUCTURAL_MARKERS: &[&str] = &["<table", "<td", "<tr", "<img", "<div"];

/// Validates composed text against the ATS output rules.
pub fn lint_output(text: &str) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    if text.trim().is_empty() {
        issues.push(LintIssue::error(codes::OUTPUT_EMPTY, "output document is empty", None));
        return issues;
    }

    if let Some(c) = text.chars().find(|c| !is_safe_char(*c)) {
        issues.push(LintIssue::error(
            codes::OUTPUT_NON_ASCII,
            format!("output contains character {c:?} outside the ASCII-safe set"),
            None,
        ));
    }

    for (number, line) in text.lines().enumerate() {
        if line.contains('|') {
            issues.push(LintIssue::error(
                codes::OUTPUT_TABLE_MARKER,
                format!("line {} contains a pipe character (table marker)", number + 1),
                None,
            ));
            break;
        }
    }
    let lowered = text.to_ascii_lowercase();
    if let Some(marker) = STRUCTURAL_MARKERS.iter().find(|m| lowered.contains(*m)) {
        issues.push(LintIssue::error(
            codes::OUTPUT_TABLE_MARKER,
            format!("output contains disallowed structural construct `{marker}`"),
            None,
        ));
    }

    check_section_order(text, &mut issues);

    issues
}

/// Validates a rendered artifact on disk, then its contents.
pub fn lint_output_file(path: &Path) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    if !path.exists() {
        issues.push(LintIssue::error(
            codes::OUTPUT_MISSING,
            format!("missing output file: {}", path.display()),
            None,
        ));
        return issues;
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    if !matches!(extension.as_deref(), Some("md") | Some("txt")) {
        issues.push(LintIssue::warning(
            codes::OUTPUT_EXT,
            format!("unexpected output extension on {}", path.display()),
            None,
        ));
    }

    match std::fs::read_to_string(path) {
        Ok(text) => issues.extend(lint_output(&text)),
        Err(err) => issues.push(LintIssue::error(
            codes::OUTPUT_UNREADABLE,
            format!("cannot read {}: {err}", path.display()),
            None,
        )),
    }
    issues
}

/// Warns when `## ` headings deviate from the canonical section order.
/// Omitted sections are fine; the requirement is a subsequence match.
fn check_section_order(text: &str, issues: &mut Vec<LintIssue>) {
    let headings = text
        .lines()
        .filter_map(|line| line.strip_prefix("## "))
        .map(str::trim);

    let mut cursor = 0usize;
    for heading in headings {
        match SECTION_ORDER[cursor..].iter().position(|s| *s == heading) {
            Some(offset) => cursor += offset + 1,
            None => {
                let message = if SECTION_ORDER.contains(&heading) {
                    format!("section `{heading}` is out of canonical order")
                } else {
                    format!("unknown section `{heading}`")
                };
                issues.push(LintIssue::warning(codes::SECTION_ORDER, message, None));
                break;
            }
        }
    }
}
