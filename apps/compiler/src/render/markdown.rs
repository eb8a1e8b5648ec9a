//! Markdown composition for CV content.
//!
//! Produces a deterministic, ATS-safe plain-text document: single column,
//! heading + bullet list constructs only, characters restricted to the safe
//! set. Experience and project sections contain only the selected ids, in
//! selection order.

use std::collections::HashMap;

use tracing::debug;

use crate::errors::AppError;
use crate::models::records::CanonicalData;
use crate::render::emphasis::emphasize;
use crate::render::normalize::normalize_inline;
use crate::select::scoring::is_open_ended;
use crate::select::SelectionResult;

/// Canonical section order. `lint_output` treats this as a subsequence
/// requirement, so sections with no content may simply be absent.
pub const SECTION_ORDER: &[&str] = &["About Me", "Experience", "Projects", "Skills", "Education"];

/// Builds the markdown document for the selected CV content.
///
/// Pure function of its inputs; composing twice yields byte-identical text.
/// Fails only when `selection` references an id absent from `data`, which
/// means the pipeline stages were called out of contract.
pub fn compose(data: &CanonicalData, selection: &SelectionResult) -> Result<String, AppError> {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# {}", normalize_inline(&data.profile.name)));
    let mut contact: Vec<String> = vec![
        normalize_inline(&data.profile.headline),
        normalize_inline(&data.profile.location),
    ];
    if let Some(email) = &data.profile.email {
        contact.push(normalize_inline(email));
    }
    contact.extend(
        data.profile
            .links
            .iter()
            .filter(|link| !link.url.trim().is_empty())
            .map(|link| normalize_inline(&link.url)),
    );
    let contact_line = contact
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" - ");
    if !contact_line.is_empty() {
        lines.push(contact_line);
    }

    let about = normalize_inline(&data.profile.about_me);
    if !about.is_empty() {
        add_section(&mut lines, "About Me");
        lines.push(about);
    }

    if !selection.selected_experience.is_empty() {
        add_section(&mut lines, "Experience");
        let by_id: HashMap<&str, &crate::models::records::ExperienceEntry> = data
            .experience
            .iter()
            .map(|e| (e.id.as_str(), e))
            .collect();
        for id in &selection.selected_experience {
            let entry = by_id.get(id.as_str()).ok_or_else(|| {
                AppError::Inconsistency(format!(
                    "selection references unknown experience entry `{id}`"
                ))
            })?;
            let mut heading = format!(
                "### {} - {}",
                normalize_inline(&entry.title),
                normalize_inline(&entry.company)
            );
            if let Some(location) = entry.location.as_deref() {
                let location = normalize_inline(location);
                if !location.is_empty() {
                    heading.push_str(&format!(" ({location})"));
                }
            }
            lines.push(heading);
            let end = entry
                .end_date
                .as_deref()
                .filter(|raw| !is_open_ended(raw))
                .map(normalize_inline)
                .unwrap_or_else(|| "Present".to_string());
            lines.push(format!("{} - {}", normalize_inline(&entry.start_date), end));
            push_bullets(&mut lines, &entry.bullets);
            add_blank(&mut lines);
        }
    }

    if !selection.selected_projects.is_empty() {
        add_section(&mut lines, "Projects");
        let by_id: HashMap<&str, &crate::models::records::ProjectEntry> =
            data.projects.iter().map(|p| (p.id.as_str(), p)).collect();
        for id in &selection.selected_projects {
            let entry = by_id.get(id.as_str()).ok_or_else(|| {
                AppError::Inconsistency(format!("selection references unknown project entry `{id}`"))
            })?;
            lines.push(format!("### {}", normalize_inline(&entry.name)));
            let mut meta: Vec<String> = Vec::new();
            if let Some(role) = entry.role.as_deref() {
                let role = normalize_inline(role);
                if !role.is_empty() {
                    meta.push(role);
                }
            }
            if let Some(start) = entry.start_date.as_deref() {
                let start = normalize_inline(start);
                if !start.is_empty() {
                    let end = entry
                        .end_date
                        .as_deref()
                        .filter(|raw| !is_open_ended(raw))
                        .map(normalize_inline)
                        .unwrap_or_else(|| "Present".to_string());
                    meta.push(format!("{start} - {end}"));
                }
            }
            if !meta.is_empty() {
                lines.push(meta.join(", "));
            }
            push_bullets(&mut lines, &entry.bullets);
            add_blank(&mut lines);
        }
    }

    if !data.skills.categories.is_empty() {
        add_section(&mut lines, "Skills");
        for category in &data.skills.categories {
            let items = category
                .items
                .iter()
                .map(|item| normalize_inline(item))
                .filter(|item| !item.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("**{}**: {items}", normalize_inline(&category.name)));
        }
    }

    if let Some(education) = &data.education {
        if !education.entries.is_empty() || !education.languages.is_empty() {
            add_section(&mut lines, "Education");
            for entry in &education.entries {
                let mut line = format!(
                    "- {} - {}",
                    normalize_inline(&entry.degree),
                    normalize_inline(&entry.institution)
                );
                if let Some(location) = entry.location.as_deref() {
                    let location = normalize_inline(location);
                    if !location.is_empty() {
                        line.push_str(&format!(" ({location})"));
                    }
                }
                let start = entry.start_date.as_deref().map(normalize_inline);
                let end = entry.end_date.as_deref().map(normalize_inline);
                match (start.as_deref(), end.as_deref()) {
                    (Some(s), Some(e)) if !s.is_empty() && !e.is_empty() => {
                        line.push_str(&format!(", {s} - {e}"))
                    }
                    (Some(s), _) if !s.is_empty() => line.push_str(&format!(", {s}")),
                    (_, Some(e)) if !e.is_empty() => line.push_str(&format!(", {e}")),
                    _ => {}
                }
                lines.push(line);
            }
            if !education.languages.is_empty() {
                let languages = education
                    .languages
                    .iter()
                    .map(|lang| normalize_inline(lang))
                    .filter(|lang| !lang.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                if !languages.is_empty() {
                    lines.push(format!("- Languages: {languages}"));
                }
            }
        }
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    debug!(lines = lines.len(), "composed markdown document");
    Ok(lines.join("\n") + "\n")
}

fn add_blank(lines: &mut Vec<String>) {
    if lines.last().is_some_and(|line| !line.is_empty()) {
        lines.push(String::new());
    }
}

fn add_section(lines: &mut Vec<String>, title: &str) {
    add_blank(lines);
    lines.push(format!("## {title}"));
}

fn push_bullets(lines: &mut Vec<String>, bullets: &[String]) {
    for bullet in bullets {
        let bullet = normalize_inline(bullet);
        if bullet.is_empty() {
            continue;
        }
        lines.push(format!("- {}", emphasize(&bullet)));
    }
}
