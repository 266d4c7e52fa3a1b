//! Size-targeted compression.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::budget::{BitrateBudget, TargetSize, BYTES_PER_MEGABYTE};
use crate::toolchain::{
    AudioCodec, AudioSettings, EncodeRequest, ShrinkError, Toolchain, VideoCodec, VideoSettings,
};

use super::types::{
    ensure_distinct_output, ensure_input_file, verify_output_file, OperationReport,
};

/// Re-encodes a video so it lands near a target size.
///
/// One call probes the duration, splits the bit budget and runs the encoder
/// exactly once. Nothing is retried.
pub struct Compressor {
    toolchain: Arc<dyn Toolchain>,
}

impl Compressor {
    pub fn new(toolchain: Arc<dyn Toolchain>) -> Self {
        Self { toolchain }
    }

    /// Builds the encoder request for an already allocated budget.
    pub fn build_request(input: &Path, output: &Path, budget: &BitrateBudget) -> EncodeRequest {
        EncodeRequest::Compress {
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            video: VideoSettings {
                codec: VideoCodec::H264,
                bitrate_kbps: budget.video_kbps(),
            },
            audio: AudioSettings {
                codec: AudioCodec::Aac,
                bitrate_kbps: budget.audio_kbps(),
            },
            faststart: true,
        }
    }

    pub async fn compress(
        &self,
        input: &Path,
        output: &Path,
        target: TargetSize,
    ) -> Result<OperationReport, ShrinkError> {
        let start = Instant::now();
        let input_size = ensure_input_file(input).await?;
        ensure_distinct_output(input, output).await?;

        info!("Analyzing video: {}", input.display());
        let duration_secs = self.toolchain.probe_duration(input).await?;
        info!(
            "Video duration: {} minutes {} seconds",
            (duration_secs / 60.0) as u64,
            (duration_secs % 60.0) as u64
        );

        let budget = BitrateBudget::allocate(target, duration_secs)?;

        info!(
            "Original file size: {:.2} MB",
            input_size as f64 / BYTES_PER_MEGABYTE
        );
        info!("Target file size: {}", target);
        info!(
            video_kbps = budget.video_bps / 1000.0,
            audio_kbps = budget.audio_bps / 1000.0,
            "Compressing video, this may take a while"
        );

        let request = Self::build_request(input, output, &budget);
        let outcome = self.toolchain.encode(&request).await?;
        if !outcome.is_success() {
            warn!(exit_code = ?outcome.exit_code, "Encoder failed");
            return Err(ShrinkError::encode_failed(outcome.exit_code, outcome.stderr));
        }

        let output_size_bytes = verify_output_file(output).await?;
        let report = OperationReport {
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            output_size_bytes,
            elapsed_ms: start.elapsed().as_millis() as u64,
            budget: Some(budget),
        };

        info!("Compression complete, actual output size: {:.2} MB", report.output_size_mb());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockToolchain;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("holiday.mov");
        std::fs::write(&input, vec![0u8; 4096]).unwrap();
        let output = dir.path().join("holiday-small.mp4");
        (dir, input, output)
    }

    #[tokio::test]
    async fn test_compress_allocates_budget_and_encodes_once() {
        let (_dir, input, output) = setup();
        let mock = Arc::new(MockToolchain::new());
        mock.set_duration(120.0).await;

        let compressor = Compressor::new(mock.clone());
        let target = TargetSize::from_megabytes(10.0).unwrap();
        let report = compressor.compress(&input, &output, target).await.unwrap();

        assert_eq!(report.output_path, output);
        assert!(report.output_size_bytes > 0);
        assert_eq!(report.budget.unwrap().video_kbps(), 571);

        let requests = mock.recorded_encodes().await;
        assert_eq!(requests.len(), 1);
        match &requests[0] {
            EncodeRequest::Compress {
                video,
                audio,
                faststart,
                ..
            } => {
                assert_eq!(video.bitrate_kbps, 571);
                assert_eq!(video.codec, VideoCodec::H264);
                assert_eq!(audio.bitrate_kbps, 128);
                assert_eq!(audio.codec, AudioCodec::Aac);
                assert!(*faststart);
            }
            other => panic!("unexpected request {:?}", other),
        }
        assert_eq!(mock.probe_count().await, 1);
    }

    #[tokio::test]
    async fn test_compress_target_too_small_skips_encoder() {
        let (_dir, input, output) = setup();
        let mock = Arc::new(MockToolchain::new());
        mock.set_duration(600.0).await;

        let compressor = Compressor::new(mock.clone());
        let target = TargetSize::from_megabytes(1.0).unwrap();
        let err = compressor.compress(&input, &output, target).await.unwrap_err();

        assert!(matches!(err, ShrinkError::TargetTooSmall { .. }));
        assert_eq!(mock.encode_count().await, 0);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_compress_missing_input_spawns_nothing() {
        let dir = TempDir::new().unwrap();
        let mock = Arc::new(MockToolchain::new());

        let compressor = Compressor::new(mock.clone());
        let err = compressor
            .compress(
                &dir.path().join("missing.mp4"),
                &dir.path().join("out.mp4"),
                TargetSize::from_megabytes(5.0).unwrap(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ShrinkError::InputNotFound { .. }));
        assert_eq!(mock.probe_count().await, 0);
        assert_eq!(mock.encode_count().await, 0);
    }

    #[tokio::test]
    async fn test_compress_probe_failure_skips_encoder() {
        let (_dir, input, output) = setup();
        let mock = Arc::new(MockToolchain::new());
        mock.fail_probe("ffprobe exited with code Some(1)").await;

        let compressor = Compressor::new(mock.clone());
        let err = compressor
            .compress(&input, &output, TargetSize::from_megabytes(10.0).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, ShrinkError::ProbeFailed { .. }));
        assert_eq!(mock.encode_count().await, 0);
    }

    #[tokio::test]
    async fn test_compress_encoder_failure_surfaces_stderr() {
        let (_dir, input, output) = setup();
        let mock = Arc::new(MockToolchain::new());
        mock.set_duration(60.0).await;
        mock.set_encode_exit(1, "Error while opening encoder").await;

        let compressor = Compressor::new(mock.clone());
        let err = compressor
            .compress(&input, &output, TargetSize::from_megabytes(50.0).unwrap())
            .await
            .unwrap_err();

        match err {
            ShrinkError::EncodeFailed { exit_code, stderr } => {
                assert_eq!(exit_code, Some(1));
                assert_eq!(stderr, "Error while opening encoder");
            }
            other => panic!("expected EncodeFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_compress_output_missing() {
        let (_dir, input, output) = setup();
        let mock = Arc::new(MockToolchain::new());
        mock.set_duration(60.0).await;
        mock.set_create_output(false).await;

        let compressor = Compressor::new(mock.clone());
        let err = compressor
            .compress(&input, &output, TargetSize::from_megabytes(50.0).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, ShrinkError::OutputMissing { .. }));
        assert_eq!(mock.encode_count().await, 1);
    }

    #[tokio::test]
    async fn test_compress_twice_overwrites_same_output() {
        let (dir, input, output) = setup();
        let mock = Arc::new(MockToolchain::new());
        mock.set_duration(120.0).await;

        let compressor = Compressor::new(mock.clone());
        let target = TargetSize::from_megabytes(10.0).unwrap();
        let first = compressor.compress(&input, &output, target).await.unwrap();
        let second = compressor.compress(&input, &output, target).await.unwrap();

        assert_eq!(first.output_size_bytes, second.output_size_bytes);
        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 2); // input + output
    }

    #[tokio::test]
    async fn test_compress_refuses_to_overwrite_input() {
        let (_dir, input, _output) = setup();
        let mock = Arc::new(MockToolchain::new());

        let compressor = Compressor::new(mock.clone());
        let err = compressor
            .compress(&input, &input, TargetSize::from_megabytes(10.0).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, ShrinkError::InvalidArgument { .. }));
        assert_eq!(mock.probe_count().await, 0);
        assert_eq!(mock.encode_count().await, 0);
    }
}
