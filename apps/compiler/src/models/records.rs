//! Canonical record types: the validated, renderable facts a CV is built from.
//!
//! Everything that appears in output must be attributable to fields on these
//! models. Records are constructed once per build by the loader and stay
//! read-only for the rest of the pipeline.

use serde::{Deserialize, Serialize};

/// A labelled URL on the profile (GitHub, personal site, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub headline: String,
    pub location: String,
    pub email: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
    pub about_me: String,
    /// Provenance reference for lint issues (origin file or record locator).
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub id: String,
    pub company: String,
    pub title: String,
    pub location: Option<String>,
    /// Year-month, e.g. `2021-03`.
    pub start_date: String,
    /// Year-month, or absent/`present`/`current` for an ongoing position.
    pub end_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    /// Per-entry importance weight for selection. Uniform (1.0) when absent.
    pub importance: Option<f64>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    pub importance: Option<f64>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsCategory {
    pub name: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    pub id: String,
    #[serde(default)]
    pub categories: Vec<SkillsCategory>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub id: String,
    #[serde(default)]
    pub entries: Vec<EducationEntry>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub source: Option<String>,
}

/// The aggregate root passed into selection and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalData {
    pub profile: Profile,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    pub skills: Skills,
    pub education: Option<Education>,
}
