//! Score composition and recency decay for entry selection.
//!
//! The weights are fixed, documented constants; changing any of them changes
//! selection output for existing inputs and requires a version bump.
//!
//! Recency is measured against the most recent parseable year-month in the
//! entry set, never against the wall clock, so two runs on the same data are
//! bit-identical regardless of when they happen.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Weight of the job-keyword overlap fraction.
pub const KEYWORD_WEIGHT: f64 = 0.5;
/// Weight of the recency term.
pub const RECENCY_WEIGHT: f64 = 0.3;
/// Weight of the per-entry importance term.
pub const IMPORTANCE_WEIGHT: f64 = 0.2;

/// Half-life of the recency decay, in months.
pub const HALF_LIFE_MONTHS: f64 = 18.0;

/// Entries scoring below this are rejected regardless of section capacity.
pub const MIN_SCORE: f64 = 0.05;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub keyword: f64,
    pub recency: f64,
    pub importance: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            keyword: KEYWORD_WEIGHT,
            recency: RECENCY_WEIGHT,
            importance: IMPORTANCE_WEIGHT,
        }
    }
}

/// Combined score: keyword * overlap + recency * decay + importance * weight,
/// clamped to [0, 1].
pub fn combined_score(
    overlap: f64,
    recency: f64,
    importance: f64,
    weights: &ScoringWeights,
) -> f64 {
    (weights.keyword * overlap + weights.recency * recency + weights.importance * importance)
        .clamp(0.0, 1.0)
}

/// Parses a `YYYY-MM` date string (a trailing `-DD` is tolerated and the day
/// is dropped) to the first of that month.
pub fn parse_year_month(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim().splitn(3, '-');
    let year = parts.next()?;
    let month = parts.next()?;
    if year.len() != 4 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Whole months from `from` to `to`; negative when `from` is later.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    i64::from(to.year() - from.year()) * 12 + i64::from(to.month() as i32 - from.month() as i32)
}

/// True for end-date spellings that mean "still ongoing".
pub fn is_open_ended(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("present")
        || trimmed.eq_ignore_ascii_case("current")
}

/// Recency score in [0, 1].
///
/// Open-ended entries (no end date, or `present`/`current`) score 1.0.
/// Dated entries decay with [`HALF_LIFE_MONTHS`] from `reference`, the most
/// recent parseable year-month in the entry set. An unparseable end date
/// scores 0.0: least recent, never a crash.
pub fn recency_score(end_date: Option<&str>, reference: Option<NaiveDate>) -> f64 {
    let raw = match end_date {
        None => return 1.0,
        Some(raw) => raw,
    };
    if is_open_ended(raw) {
        return 1.0;
    }
    let end = match parse_year_month(raw) {
        Some(end) => end,
        None => return 0.0,
    };
    let reference = match reference {
        Some(reference) => reference,
        None => return 1.0, // only reachable when `end` itself set the max
    };
    let months = months_between(end, reference).max(0) as f64;
    0.5_f64.powf(months / HALF_LIFE_MONTHS).clamp(0.0, 1.0)
}

/// Most recent parseable year-month among the given date strings.
pub fn latest_year_month<'a>(dates: impl IntoIterator<Item = &'a str>) -> Option<NaiveDate> {
    dates.into_iter().filter_map(parse_year_month).max()
}
