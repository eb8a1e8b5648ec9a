//! Deterministic entry selection.
//!
//! Scores and orders experience/project entries against job keywords,
//! producing an explainable selection result. Identical inputs always yield
//! bit-identical output, including decision ordering: the ranking is a total
//! order (score desc, recency desc, id asc) and every keyword set iterates in
//! `BTreeSet` order.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::job::JobSpec;
use crate::models::records::CanonicalData;
use crate::select::keywords::{entry_keywords, job_keywords};
use crate::select::scoring::{
    combined_score, is_open_ended, latest_year_month, parse_year_month, recency_score,
    ScoringWeights, MIN_SCORE,
};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Per-kind selection caps.
const MAX_EXPERIENCE: usize = 8;
const MAX_PROJECTS: usize = 4;

/// One decision per evaluated entry, selected or not. Produced fresh on every
/// run and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionDecision {
    pub id: String,
    pub score: f64,
    pub matched_keywords: Vec<String>,
    pub reasons: Vec<String>,
}

/// Ordered selected ids per kind, plus the full decision trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub selected_experience: Vec<String>,
    pub selected_projects: Vec<String>,
    pub decisions: Vec<SelectionDecision>,
}

/// An entry flattened to the facts scoring needs, independent of kind.
struct Candidate {
    id: String,
    keywords: BTreeSet<String>,
    end_date: Option<String>,
    importance: Option<f64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Selection algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Selects which entries to include, deterministically.
///
/// With no job (or a job that derives zero keywords) the keyword term is zero
/// for every entry and ranking degrades to recency and importance.
pub fn select(data: &CanonicalData, job: Option<&JobSpec>) -> SelectionResult {
    let weights = ScoringWeights::default();
    let job_kw = job.map(job_keywords).unwrap_or_default();

    let experience: Vec<Candidate> = data
        .experience
        .iter()
        .map(|e| Candidate {
            id: e.id.clone(),
            keywords: entry_keywords(&e.tags, &e.bullets),
            end_date: e.end_date.clone(),
            importance: e.importance,
        })
        .collect();
    let exp_reference = latest_year_month(
        data.experience
            .iter()
            .flat_map(|e| [Some(e.start_date.as_str()), e.end_date.as_deref()])
            .flatten(),
    );

    let projects: Vec<Candidate> = data
        .projects
        .iter()
        .map(|p| Candidate {
            id: p.id.clone(),
            keywords: entry_keywords(&p.tags, &p.bullets),
            end_date: p.end_date.clone(),
            importance: p.importance,
        })
        .collect();
    let proj_reference = latest_year_month(
        data.projects
            .iter()
            .flat_map(|p| [p.start_date.as_deref(), p.end_date.as_deref()])
            .flatten(),
    );

    let (selected_experience, mut decisions) =
        rank_kind(experience, exp_reference, &job_kw, &weights, MAX_EXPERIENCE);
    let (selected_projects, project_decisions) =
        rank_kind(projects, proj_reference, &job_kw, &weights, MAX_PROJECTS);
    decisions.extend(project_decisions);

    debug!(
        experience = selected_experience.len(),
        projects = selected_projects.len(),
        decisions = decisions.len(),
        "selection complete"
    );

    SelectionResult {
        selected_experience,
        selected_projects,
        decisions,
    }
}

struct Ranked {
    id: String,
    score: f64,
    recency: f64,
    matched: Vec<String>,
    reasons: Vec<String>,
}

/// Scores and ranks one kind of entry, applying the minimum-score threshold
/// and the per-kind cap. Returns selected ids in rank order and a decision
/// for every candidate, also in rank order.
fn rank_kind(
    candidates: Vec<Candidate>,
    reference: Option<NaiveDate>,
    job_kw: &BTreeSet<String>,
    weights: &ScoringWeights,
    cap: usize,
) -> (Vec<String>, Vec<SelectionDecision>) {
    let mut ranked: Vec<Ranked> = candidates
        .into_iter()
        .map(|candidate| score_candidate(candidate, reference, job_kw, weights))
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.recency.total_cmp(&a.recency))
            .then_with(|| a.id.cmp(&b.id))
    });

    let total = ranked.len();
    let mut selected = Vec::new();
    let mut decisions = Vec::with_capacity(total);
    for (rank, mut entry) in ranked.into_iter().enumerate() {
        if entry.score < MIN_SCORE {
            entry.reasons.push(format!(
                "rejected: score {:.3} below minimum {MIN_SCORE:.2}",
                entry.score
            ));
        } else if selected.len() < cap {
            entry
                .reasons
                .push(format!("selected (rank {} of {total})", rank + 1));
            selected.push(entry.id.clone());
        } else {
            entry
                .reasons
                .push(format!("rejected: section limit reached ({cap} max)"));
        }
        decisions.push(SelectionDecision {
            id: entry.id,
            score: entry.score,
            matched_keywords: entry.matched,
            reasons: entry.reasons,
        });
    }
    (selected, decisions)
}

fn score_candidate(
    candidate: Candidate,
    reference: Option<NaiveDate>,
    job_kw: &BTreeSet<String>,
    weights: &ScoringWeights,
) -> Ranked {
    let matched: Vec<String> = candidate
        .keywords
        .intersection(job_kw)
        .cloned()
        .collect();
    let overlap = if job_kw.is_empty() {
        0.0
    } else {
        matched.len() as f64 / job_kw.len() as f64
    };
    let recency = recency_score(candidate.end_date.as_deref(), reference);
    let importance = candidate.importance.unwrap_or(1.0);
    let score = combined_score(overlap, recency, importance, weights);

    let mut reasons = Vec::new();
    if job_kw.is_empty() {
        reasons.push("no job keywords; ranked by recency and importance".to_string());
    } else if matched.is_empty() {
        reasons.push(format!("no overlap with {} job keywords", job_kw.len()));
    } else {
        reasons.push(format!(
            "matched {}/{} job keywords: {}",
            matched.len(),
            job_kw.len(),
            matched.join(", ")
        ));
    }
    match candidate.end_date.as_deref() {
        None => reasons.push("currently active".to_string()),
        Some(raw) if is_open_ended(raw) => reasons.push("currently active".to_string()),
        Some(raw) if parse_year_month(raw).is_none() => {
            reasons.push(format!("unparseable end date `{raw}`; treated as least recent"))
        }
        Some(raw) => reasons.push(format!("ended {}", raw.trim())),
    }
    if let Some(weight) = candidate.importance {
        reasons.push(format!("importance override {weight:.2}"));
    }

    Ranked {
        id: candidate.id,
        score,
        recency,
        matched,
        reasons,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
