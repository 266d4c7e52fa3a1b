//! Sequential batch extraction.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::ops::{Extractor, EXTRACT_AUDIO_CODEC};

use super::types::BatchItemResult;

/// Where the extracted audio for `input` goes: `<stem>.mp3` next to the input,
/// or inside `output_dir` when one is given.
pub fn audio_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "audio".to_string());
    let name = format!("{}.{}", stem, EXTRACT_AUDIO_CODEC.extension());

    match output_dir.or_else(|| input.parent()) {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Extracts audio from each input in order, one at a time.
///
/// Every input gets its own result; a failure is recorded and the loop moves
/// on to the next input.
pub async fn extract_batch(
    extractor: &Extractor,
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    bitrate_kbps: u32,
) -> Vec<BatchItemResult> {
    let mut results = Vec::with_capacity(inputs.len());

    for (index, input) in inputs.iter().enumerate() {
        info!("Batch item {}/{}: {}", index + 1, inputs.len(), input.display());
        let output = audio_output_path(input, output_dir);

        let result = match extractor.extract(input, &output, bitrate_kbps).await {
            Ok(report) => BatchItemResult {
                input_path: input.clone(),
                success: true,
                output_path: Some(report.output_path),
                output_size_bytes: Some(report.output_size_bytes),
                error: None,
            },
            Err(e) => {
                warn!(kind = e.kind(), "Batch item failed: {}", e);
                BatchItemResult {
                    input_path: input.clone(),
                    success: false,
                    output_path: None,
                    output_size_bytes: None,
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(result);
    }

    results
}
