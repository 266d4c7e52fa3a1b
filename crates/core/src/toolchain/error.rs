//! Error types shared by the toolchain and the operations built on it.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while compressing or extracting.
///
/// Every variant is terminal for the operation that produced it; nothing is
/// retried internally.
#[derive(Debug, Error)]
pub enum ShrinkError {
    /// Input file does not exist or is not a regular file.
    #[error("Input file '{}' does not exist", .path.display())]
    InputNotFound { path: PathBuf },

    /// Duration probe exited non-zero or printed something unusable.
    #[error("Failed to probe video duration: {reason}")]
    ProbeFailed { reason: String },

    /// The requested size cannot even hold the reserved audio stream.
    #[error(
        "Target size too small for this video: {:.2} kbps available, {:.0} kbps reserved for audio",
        .total_bps / 1000.0,
        .audio_bps / 1000.0
    )]
    TargetTooSmall { total_bps: f64, audio_bps: f64 },

    /// Encoder exited with a non-zero status.
    #[error("Encoding failed (exit code {}): {stderr}", .exit_code.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string()))]
    EncodeFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Encoder reported success but left no file behind.
    #[error("Output file '{}' was not created", .path.display())]
    OutputMissing { path: PathBuf },

    /// Non-positive or non-numeric size or bitrate.
    #[error("{reason}")]
    InvalidArgument { reason: String },

    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {}", .path.display())]
    FfmpegNotFound { path: PathBuf },

    /// FFprobe binary not found.
    #[error("FFprobe not found at path: {}", .path.display())]
    FfprobeNotFound { path: PathBuf },

    /// Child process exceeded the configured timeout and was killed.
    #[error("External tool timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Child process was killed through a cancellation token.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShrinkError {
    pub fn probe_failed(reason: impl Into<String>) -> Self {
        Self::ProbeFailed {
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn encode_failed(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::EncodeFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Stable snake_case code for logs and API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputNotFound { .. } => "input_not_found",
            Self::ProbeFailed { .. } => "probe_failed",
            Self::TargetTooSmall { .. } => "target_too_small",
            Self::EncodeFailed { .. } => "encode_failed",
            Self::OutputMissing { .. } => "output_missing",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::FfmpegNotFound { .. } => "ffmpeg_not_found",
            Self::FfprobeNotFound { .. } => "ffprobe_not_found",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
            Self::Io(_) => "io",
        }
    }
}
