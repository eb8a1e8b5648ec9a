//! Structural validation of inputs and rendered output.
//!
//! Lint entry points never mutate and never fail: data-shape problems become
//! severity-tagged issues. `error` means the artifact is not fit for purpose
//! (ATS safety or data integrity); `warning` is advisory and never blocks.

pub mod inputs;
pub mod output;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use inputs::lint_inputs;
pub use output::{lint_output, lint_output_file};

/// Stable issue codes. External tooling matches on these strings, so renaming
/// one is a breaking change.
pub mod codes {
    pub const ID_MISSING: &str = "ID_MISSING";
    pub const ID_DUPLICATE: &str = "ID_DUPLICATE";
    pub const LINK_URL_MISSING: &str = "LINK_URL_MISSING";
    pub const START_DATE_MISSING: &str = "START_DATE_MISSING";
    pub const START_DATE_INVALID: &str = "START_DATE_INVALID";
    pub const BULLET_EMPTY: &str = "BULLET_EMPTY";
    pub const TEXT_NEWLINE: &str = "TEXT_NEWLINE";
    pub const TEXT_TAB: &str = "TEXT_TAB";
    pub const TEXT_NON_ASCII: &str = "TEXT_NON_ASCII";
    pub const NO_EXPERIENCE: &str = "NO_EXPERIENCE";
    pub const OUTPUT_EMPTY: &str = "OUTPUT_EMPTY";
    pub const OUTPUT_NON_ASCII: &str = "OUTPUT_NON_ASCII";
    pub const OUTPUT_TABLE_MARKER: &str = "OUTPUT_TABLE_MARKER";
    pub const SECTION_ORDER: &str = "SECTION_ORDER";
    pub const OUTPUT_MISSING: &str = "OUTPUT_MISSING";
    pub const OUTPUT_EXT: &str = "OUTPUT_EXT";
    pub const OUTPUT_UNREADABLE: &str = "OUTPUT_UNREADABLE";
    pub const LLM_REWRITE_FAILED: &str = "LLM_REWRITE_FAILED";
    pub const LLM_REWRITE_TIMEOUT: &str = "LLM_REWRITE_TIMEOUT";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A pure observation about the data or the rendered artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintIssue {
    pub code: String,
    pub message: String,
    pub severity: Severity,
    pub source: Option<String>,
}

impl LintIssue {
    pub fn error(code: &str, message: impl Into<String>, source: Option<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: Severity::Error,
            source,
        }
    }

    pub fn warning(code: &str, message: impl Into<String>, source: Option<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: Severity::Warning,
            source,
        }
    }
}

/// True when any issue is error severity.
pub fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|issue| issue.severity == Severity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Error).unwrap(), "\"error\"");
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
    }

    #[test]
    fn test_has_errors() {
        let warning = LintIssue::warning(codes::NO_EXPERIENCE, "no experience entries", None);
        assert!(!has_errors(&[warning.clone()]));
        let error = LintIssue::error(codes::ID_MISSING, "empty id", None);
        assert!(has_errors(&[warning, error]));
        assert!(!has_errors(&[]));
    }
}
