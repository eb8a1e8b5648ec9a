//! JSON record loading.
//!
//! The interchange format is plain JSON matching the model types; richer
//! source formats (frontmatter files and the like) are converted upstream.

use std::path::Path;

use tracing::debug;

use crate::errors::AppError;
use crate::models::job::JobSpec;
use crate::models::records::CanonicalData;

pub fn load_canonical_data(path: &Path) -> Result<CanonicalData, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let data: CanonicalData = serde_json::from_str(&raw)?;
    debug!(
        path = %path.display(),
        experience = data.experience.len(),
        projects = data.projects.len(),
        "loaded canonical data"
    );
    Ok(data)
}

pub fn load_job_spec(path: &Path) -> Result<JobSpec, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let job: JobSpec = serde_json::from_str(&raw)?;
    debug!(path = %path.display(), id = %job.id, "loaded job spec");
    Ok(job)
}
