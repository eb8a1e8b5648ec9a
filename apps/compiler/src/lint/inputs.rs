//! Input lint: validates canonical data before a build.
//!
//! Each rule is independently checkable; a single bad record produces issues,
//! never a hard failure.

use std::collections::HashMap;

use crate::lint::{codes, LintIssue};
use crate::models::records::CanonicalData;
use crate::render::normalize::normalize_inline;
use crate::select::scoring::parse_year_month;

/// Validates canonical data against schema and content constraints.
pub fn lint_inputs(data: &CanonicalData) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    check_ids(data, &mut issues);

    lint_inline_text(
        &data.profile.about_me,
        "profile.about_me",
        data.profile.source.clone(),
        &mut issues,
    );

    for link in &data.profile.links {
        if link.url.trim().is_empty() {
            issues.push(LintIssue::warning(
                codes::LINK_URL_MISSING,
                format!("profile link `{}` is missing a URL; it will be skipped", link.label),
                data.profile.source.clone(),
            ));
        }
    }

    if data.experience.is_empty() {
        issues.push(LintIssue::warning(
            codes::NO_EXPERIENCE,
            "no experience entries; the Experience section will be absent",
            None,
        ));
    }

    for entry in &data.experience {
        if entry.start_date.trim().is_empty() {
            issues.push(LintIssue::error(
                codes::START_DATE_MISSING,
                format!("experience `{}` has no start date", entry.id),
                entry.source.clone(),
            ));
        } else if parse_year_month(&entry.start_date).is_none() {
            issues.push(LintIssue::error(
                codes::START_DATE_INVALID,
                format!(
                    "experience `{}` start date `{}` is not year-month (YYYY-MM)",
                    entry.id, entry.start_date
                ),
                entry.source.clone(),
            ));
        }
        lint_bullets(
            &entry.bullets,
            &format!("experience[{}]", entry.id),
            entry.source.clone(),
            &mut issues,
        );
    }

    for entry in &data.projects {
        lint_bullets(
            &entry.bullets,
            &format!("projects[{}]", entry.id),
            entry.source.clone(),
            &mut issues,
        );
    }

    issues
}

/// Checks id presence and uniqueness across the whole record set.
fn check_ids(data: &CanonicalData, issues: &mut Vec<LintIssue>) {
    let mut all_ids: Vec<(&str, Option<&str>)> = vec![
        (data.profile.id.as_str(), data.profile.source.as_deref()),
        (data.skills.id.as_str(), data.skills.source.as_deref()),
    ];
    if let Some(education) = &data.education {
        all_ids.push((education.id.as_str(), education.source.as_deref()));
    }
    for entry in &data.experience {
        all_ids.push((entry.id.as_str(), entry.source.as_deref()));
    }
    for entry in &data.projects {
        all_ids.push((entry.id.as_str(), entry.source.as_deref()));
    }

    let mut seen: HashMap<&str, Option<&str>> = HashMap::new();
    for (id, source) in all_ids {
        if id.trim().is_empty() {
            issues.push(LintIssue::error(
                codes::ID_MISSING,
                "record has an empty identifier",
                source.map(|s| s.to_string()),
            ));
            continue;
        }
        if let Some(prior) = seen.get(id) {
            issues.push(LintIssue::error(
                codes::ID_DUPLICATE,
                format!(
                    "duplicate id `{id}` (also seen in {})",
                    prior.unwrap_or("<unknown source>")
                ),
                source.map(|s| s.to_string()),
            ));
        } else {
            seen.insert(id, source);
        }
    }
}

fn lint_bullets(
    bullets: &[String],
    field: &str,
    source: Option<String>,
    issues: &mut Vec<LintIssue>,
) {
    for (index, bullet) in bullets.iter().enumerate() {
        if normalize_inline(bullet).is_empty() {
            issues.push(LintIssue::error(
                codes::BULLET_EMPTY,
                format!("{field}.bullets[{index}] is empty after normalization"),
                source.clone(),
            ));
            continue;
        }
        lint_inline_text(bullet, &format!("{field}.bullets[{index}]"), source.clone(), issues);
    }
}

/// Structural checks on a single inline field.
fn lint_inline_text(
    text: &str,
    field: &str,
    source: Option<String>,
    issues: &mut Vec<LintIssue>,
) {
    if text.contains('\n') || text.contains('\r') {
        issues.push(LintIssue::error(
            codes::TEXT_NEWLINE,
            format!("newline not allowed in {field}"),
            source.clone(),
        ));
    }
    if text.contains('\t') {
        issues.push(LintIssue::error(
            codes::TEXT_TAB,
            format!("tab not allowed in {field}"),
            source.clone(),
        ));
    }
    if let Some(c) = text.chars().find(|c| !c.is_ascii()) {
        issues.push(LintIssue::warning(
            codes::TEXT_NON_ASCII,
            format!("non-ASCII character {c:?} in {field} (ATS risk; will be transliterated)"),
            source,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::{has_errors, Severity};
    use crate::models::records::{
        CanonicalData, Education, ExperienceEntry, Link, Profile, ProjectEntry, Skills,
    };

    fn make_data() -> CanonicalData {
        CanonicalData {
            profile: Profile {
                id: "profile".to_string(),
                name: "Ada Lovelace".to_string(),
                headline: "Engineer".to_string(),
                location: "London".to_string(),
                email: None,
                links: vec![],
                about_me: "Reliable systems.".to_string(),
                source: Some("profile.json".to_string()),
            },
            experience: vec![ExperienceEntry {
                id: "acme".to_string(),
                company: "Acme".to_string(),
                title: "Engineer".to_string(),
                location: None,
                start_date: "2020-01".to_string(),
                end_date: None,
                tags: vec![],
                bullets: vec!["Shipped things".to_string()],
                importance: None,
                source: Some("experience/acme.json".to_string()),
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

    #[test]
    fn test_clean_data_has_no_issues() {
        let issues = lint_inputs(&make_data());
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn test_duplicate_id_is_error() {
        let mut data = make_data();
        data.projects.push(ProjectEntry {
            id: "acme".to_string(),
            name: "Acme clone".to_string(),
            role: None,
            start_date: None,
            end_date: None,
            tags: vec![],
            bullets: vec![],
            importance: None,
            source: Some("projects/acme.json".to_string()),
        });
        let issues = lint_inputs(&data);
        let dup = issues
            .iter()
            .find(|i| i.code == codes::ID_DUPLICATE)
            .expect("duplicate id issue");
        assert_eq!(dup.severity, Severity::Error);
        assert!(dup.message.contains("acme"));
        assert!(dup.message.contains("experience/acme.json"));
    }

    #[test]
    fn test_empty_id_is_error() {
        let mut data = make_data();
        data.experience[0].id = "  ".to_string();
        let issues = lint_inputs(&data);
        assert!(issues.iter().any(|i| i.code == codes::ID_MISSING));
    }

    #[test]
    fn test_missing_and_invalid_start_dates() {
        let mut data = make_data();
        data.experience[0].start_date = String::new();
        let issues = lint_inputs(&data);
        assert!(issues.iter().any(|i| i.code == codes::START_DATE_MISSING));

        let mut data = make_data();
        data.experience[0].start_date = "early 2020".to_string();
        let issues = lint_inputs(&data);
        assert!(issues.iter().any(|i| i.code == codes::START_DATE_INVALID));
        assert!(has_errors(&issues));
    }

    #[test]
    fn test_empty_bullet_is_error() {
        let mut data = make_data();
        data.experience[0].bullets.push("   ".to_string());
        let issues = lint_inputs(&data);
        let issue = issues
            .iter()
            .find(|i| i.code == codes::BULLET_EMPTY)
            .expect("empty bullet issue");
        assert!(issue.message.contains("bullets[1]"));
    }

    #[test]
    fn test_missing_link_url_is_warning_not_error() {
        let mut data = make_data();
        data.profile.links.push(Link {
            label: "Blog".to_string(),
            url: String::new(),
        });
        let issues = lint_inputs(&data);
        let issue = issues
            .iter()
            .find(|i| i.code == codes::LINK_URL_MISSING)
            .expect("link issue");
        assert_eq!(issue.severity, Severity::Warning);
        assert!(!has_errors(&issues));
    }

    #[test]
    fn test_non_ascii_bullet_is_warning() {
        let mut data = make_data();
        data.experience[0].bullets.push("Improved caf\u{00E9} throughput".to_string());
        let issues = lint_inputs(&data);
        let issue = issues
            .iter()
            .find(|i| i.code == codes::TEXT_NON_ASCII)
            .expect("non-ascii issue");
        assert_eq!(issue.severity, Severity::Warning);
    }

    #[test]
    fn test_newline_in_bullet_is_error() {
        let mut data = make_data();
        data.experience[0].bullets.push("line one\nline two".to_string());
        let issues = lint_inputs(&data);
        assert!(issues.iter().any(|i| i.code == codes::TEXT_NEWLINE));
    }

    #[test]
    fn test_no_experience_is_warning() {
        let mut data = make_data();
        data.experience.clear();
        let issues = lint_inputs(&data);
        let issue = issues
            .iter()
            .find(|i| i.code == codes::NO_EXPERIENCE)
            .expect("no-experience issue");
        assert_eq!(issue.severity, Severity::Warning);
    }
}
