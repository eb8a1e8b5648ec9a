//! Keyword normalization shared by entries and job specs.
//!
//! Both sides of the match are tokenized the same way: lower-cased
//! alphanumeric runs, stop words and single characters dropped, duplicates
//! collapsed. `BTreeSet` keeps iteration order deterministic, which keeps
//! matched-keyword lists and therefore decision output byte-stable.

use std::collections::BTreeSet;

use crate::models::job::JobSpec;

/// Filler words that carry no matching signal in tags or job text.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in", "into",
    "is", "it", "of", "on", "or", "our", "per", "that", "the", "their", "this", "to", "via", "we",
    "will", "with", "you", "your",
];

/// Splits `text` into normalized keyword tokens.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(|t| t.to_lowercase())
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

/// Keyword set of an entry: its tags plus its bullet text.
pub fn entry_keywords<'a>(
    tags: impl IntoIterator<Item = &'a String>,
    bullets: impl IntoIterator<Item = &'a String>,
) -> BTreeSet<String> {
    let mut keywords = BTreeSet::new();
    for tag in tags {
        keywords.extend(tokenize(tag));
    }
    for bullet in bullets {
        keywords.extend(tokenize(bullet));
    }
    keywords
}

/// Keyword set of a job: the loader-provided list plus the raw description,
/// normalized identically to entry keywords.
pub fn job_keywords(job: &JobSpec) -> BTreeSet<String> {
    let mut keywords = tokenize(&job.raw_text);
    for keyword in &job.keywords {
        keywords.extend(tokenize(keyword));
    }
    keywords
}
