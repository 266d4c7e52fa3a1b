//! Audio track extraction.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::toolchain::{AudioCodec, AudioSettings, EncodeRequest, ShrinkError, Toolchain};

use super::types::{
    ensure_distinct_output, ensure_input_file, verify_output_file, OperationReport,
};

/// Bitrate used when the caller does not pick one.
pub const DEFAULT_AUDIO_BITRATE_KBPS: u32 = 192;

/// Codec for extracted tracks.
pub const EXTRACT_AUDIO_CODEC: AudioCodec = AudioCodec::Mp3;

/// Appends the default audio extension when `output` has none.
///
/// `clip` becomes `clip.mp3`; `clip.ogg` is left alone.
pub fn resolve_audio_output(output: &Path) -> PathBuf {
    match output.extension() {
        Some(ext) if !ext.is_empty() => output.to_path_buf(),
        _ => output.with_extension(EXTRACT_AUDIO_CODEC.extension()),
    }
}

/// Pulls the audio out of a video into a standalone compressed file.
pub struct Extractor {
    toolchain: Arc<dyn Toolchain>,
}

impl Extractor {
    pub fn new(toolchain: Arc<dyn Toolchain>) -> Self {
        Self { toolchain }
    }

    pub async fn extract(
        &self,
        input: &Path,
        output: &Path,
        bitrate_kbps: u32,
    ) -> Result<OperationReport, ShrinkError> {
        let start = Instant::now();
        ensure_input_file(input).await?;

        if bitrate_kbps == 0 {
            return Err(ShrinkError::invalid_argument(
                "Audio bitrate must be a positive number.",
            ));
        }

        let output = resolve_audio_output(output);
        ensure_distinct_output(input, &output).await?;

        let request = EncodeRequest::ExtractAudio {
            input_path: input.to_path_buf(),
            output_path: output.clone(),
            audio: AudioSettings {
                codec: EXTRACT_AUDIO_CODEC,
                bitrate_kbps,
            },
        };

        info!(
            "Extracting audio: {} -> {} ({} kbps)",
            input.display(),
            output.display(),
            bitrate_kbps
        );
        let outcome = self.toolchain.encode(&request).await?;
        if !outcome.is_success() {
            warn!(exit_code = ?outcome.exit_code, "Encoder failed");
            return Err(ShrinkError::encode_failed(outcome.exit_code, outcome.stderr));
        }

        let output_size_bytes = verify_output_file(&output).await?;
        let report = OperationReport {
            input_path: input.to_path_buf(),
            output_path: output,
            output_size_bytes,
            elapsed_ms: start.elapsed().as_millis() as u64,
            budget: None,
        };

        info!("Extraction complete, output size: {:.2} MB", report.output_size_mb());
        Ok(report)
    }
}
