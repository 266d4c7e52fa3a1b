//! Types for the ops module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::budget::{BitrateBudget, BYTES_PER_MEGABYTE};
use crate::toolchain::ShrinkError;

/// Result of a successful compress or extract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationReport {
    /// Input file path.
    pub input_path: PathBuf,
    /// Output file path, after any extension was appended.
    pub output_path: PathBuf,
    /// Output file size in bytes.
    pub output_size_bytes: u64,
    /// Wall time of the whole operation in milliseconds.
    pub elapsed_ms: u64,
    /// Bitrate split used for compression; absent for extraction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<BitrateBudget>,
}

impl OperationReport {
    pub fn output_size_mb(&self) -> f64 {
        self.output_size_bytes as f64 / BYTES_PER_MEGABYTE
    }
}

/// Fails with [`ShrinkError::InputNotFound`] unless `path` is a regular file.
pub(crate) async fn ensure_input_file(path: &Path) -> Result<u64, ShrinkError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        _ => Err(ShrinkError::InputNotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// Fails with [`ShrinkError::InvalidArgument`] when `output` names the same
/// file as `input`. ffmpeg would truncate the input while still reading it.
pub(crate) async fn ensure_distinct_output(input: &Path, output: &Path) -> Result<(), ShrinkError> {
    let same = input == output
        || match (
            tokio::fs::canonicalize(input).await,
            tokio::fs::canonicalize(output).await,
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };

    if same {
        return Err(ShrinkError::invalid_argument(format!(
            "Output file '{}' is the same as the input file",
            output.display()
        )));
    }
    Ok(())
}

/// Returns the output size, failing with [`ShrinkError::OutputMissing`] when
/// the encoder left nothing (or an empty file) behind.
pub(crate) async fn verify_output_file(path: &Path) -> Result<u64, ShrinkError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(meta.len()),
        _ => Err(ShrinkError::OutputMissing {
            path: path.to_path_buf(),
        }),
    }
}
