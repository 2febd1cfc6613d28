//! Error types for the analysis pipeline and its sinks.

use std::path::PathBuf;
use thiserror::Error;

use flashguard_media::MediaError;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors surfaced by the orchestrator and the report boundaries.
///
/// The pipeline stages themselves are pure and cannot fail; only the
/// frame source, the sinks, and the uploader produce errors.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(
        "frame {index} is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        index: u64,
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("failed to write report artifact {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("report upload failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("report upload rejected with status {status}")]
    UploadRejected { status: reqwest::StatusCode },
}

impl AnalysisError {
    /// Create a sink failure for `path`.
    pub fn report_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReportWrite {
            path: path.into(),
            source,
        }
    }
}
