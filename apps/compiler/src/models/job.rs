//! Job specification: free-text description plus derived keyword tokens.

use serde::{Deserialize, Serialize};

/// A target job. Absent job means "generic" selection.
///
/// `keywords` is the loader-derived token list; the selector re-normalizes it
/// together with `raw_text`, so duplicates or mixed case here are harmless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    pub id: String,
    pub title: Option<String>,
    pub raw_text: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub source: Option<String>,
}
