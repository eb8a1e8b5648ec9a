//! Human-readable rendering of selection decisions for `cv explain`.

use std::fmt::Write;

use crate::select::SelectionResult;

/// Formats the full decision trail, selected and rejected alike.
pub fn format_selection_explanation(selection: &SelectionResult) -> String {
    let mut out = String::new();

    let experience = join_or_none(&selection.selected_experience);
    let projects = join_or_none(&selection.selected_projects);
    let _ = writeln!(out, "Selected experience: {experience}");
    let _ = writeln!(out, "Selected projects:   {projects}");

    if selection.decisions.is_empty() {
        let _ = writeln!(out, "\nNo entries were evaluated.");
        return out;
    }

    let _ = writeln!(out, "\nDecisions:");
    for decision in &selection.decisions {
        let matched = if decision.matched_keywords.is_empty() {
            "-".to_string()
        } else {
            decision.matched_keywords.join(", ")
        };
        let _ = writeln!(
            out,
            "  {:<24} score={:.3}  matched=[{}]",
            decision.id, decision.score, matched
        );
        for reason in &decision.reasons {
            let _ = writeln!(out, "      - {reason}");
        }
    }
    out
}

fn join_or_none(ids: &[String]) -> String {
    if ids.is_empty() {
        "(none)".to_string()
    } else {
        ids.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::{SelectionDecision, SelectionResult};

    fn make_selection() -> SelectionResult {
        SelectionResult {
            selected_experience: vec!["acme".to_string()],
            selected_projects: vec![],
            decisions: vec![
                SelectionDecision {
                    id: "acme".to_string(),
                    score: 0.85,
                    matched_keywords: vec!["rust".to_string()],
                    reasons: vec![
                        "matched 1/3 job keywords: rust".to_string(),
                        "currently active".to_string(),
                        "selected (rank 1 of 2)".to_string(),
                    ],
                },
                SelectionDecision {
                    id: "oldco".to_string(),
                    score: 0.02,
                    matched_keywords: vec![],
                    reasons: vec!["rejected: score 0.020 below minimum 0.05".to_string()],
                },
            ],
        }
    }

    #[test]
    fn test_explanation_lists_all_decisions() {
        let text = format_selection_explanation(&make_selection());
        assert!(text.contains("Selected experience: acme"));
        assert!(text.contains("Selected projects:   (none)"));
        assert!(text.contains("acme"));
        assert!(text.contains("oldco"));
        assert!(text.contains("score=0.850"));
        assert!(text.contains("matched=[rust]"));
        assert!(text.contains("below minimum"));
    }

    #[test]
    fn test_empty_selection_explains_itself() {
        let selection = SelectionResult {
            selected_experience: vec![],
            selected_projects: vec![],
            decisions: vec![],
        };
        let text = format_selection_explanation(&selection);
        assert!(text.contains("(none)"));
        assert!(text.contains("No entries were evaluated"));
    }
}
