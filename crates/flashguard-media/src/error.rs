//! Error types for the frame source.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for frame-source operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while probing or decoding a video.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("Video file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("FFprobe command failed: {message}")]
    ProbeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("Frame decoding failed: {message}")]
    DecodeFailed {
        message: String,
        exit_code: Option<i32>,
    },

    #[error("Invalid video file: {0}")]
    InvalidVideo(String),

    #[error("Frame buffer capacity must be at least 1, got {0}")]
    InvalidBufferCapacity(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create a decode failure error.
    pub fn decode_failed(message: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::DecodeFailed {
            message: message.into(),
            exit_code,
        }
    }
}
