use thiserror::Error;

/// Application-level error type.
///
/// Data-shape problems never land here; they become lint issues. The only
/// core failure is `Inconsistency`: the pipeline stages were called out of
/// contract (for example a selection referencing an id the data does not
/// contain). `Io`/`Json` cover the mechanical loading shell.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("pipeline inconsistency: {0}")]
    Inconsistency(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
