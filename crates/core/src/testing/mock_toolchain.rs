//! Mock toolchain for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::toolchain::{EncodeOutcome, EncodeRequest, ShrinkError, Toolchain};

/// Mock implementation of the Toolchain trait.
///
/// Provides controllable behavior for testing:
/// - Record probe paths and encode requests for assertions
/// - Script durations per path, or a default
/// - Simulate non-zero encoder exits, globally or per input
/// - Choose whether a "successful" encode actually writes the output file
///
/// # Example
///
/// ```rust,ignore
/// use clipsqueeze_core::testing::MockToolchain;
///
/// let toolchain = Arc::new(MockToolchain::new());
/// toolchain.set_duration(120.0).await;
///
/// let compressor = Compressor::new(toolchain.clone());
/// compressor.compress(&input, &output, target).await?;
///
/// assert_eq!(toolchain.encode_count().await, 1);
/// ```
#[derive(Debug)]
pub struct MockToolchain {
    /// Paths passed to `probe_duration`, in call order.
    probes: Arc<RwLock<Vec<PathBuf>>>,
    /// Requests passed to `encode`, in call order.
    encodes: Arc<RwLock<Vec<EncodeRequest>>>,
    /// Duration returned for paths without a specific entry.
    default_duration: Arc<RwLock<f64>>,
    /// Per-path durations.
    durations: Arc<RwLock<HashMap<PathBuf, f64>>>,
    /// When set, every probe fails with this reason.
    probe_failure: Arc<RwLock<Option<String>>>,
    /// Exit code and stderr returned by every encode.
    encode_outcome: Arc<RwLock<EncodeOutcome>>,
    /// Inputs whose encodes exit non-zero regardless of `encode_outcome`.
    failing_inputs: Arc<RwLock<HashMap<PathBuf, EncodeOutcome>>>,
    /// Whether successful encodes write the output file.
    create_output: Arc<RwLock<bool>>,
    /// Bytes written to the output file.
    output_bytes: Arc<RwLock<Vec<u8>>>,
    /// If set, `validate` fails with this error once.
    validate_error: Arc<RwLock<Option<ShrinkError>>>,
}

impl Default for MockToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl MockToolchain {
    /// Create a new mock toolchain.
    ///
    /// Defaults: 60 second durations, encodes exit 0 and write a small file.
    pub fn new() -> Self {
        Self {
            probes: Arc::new(RwLock::new(Vec::new())),
            encodes: Arc::new(RwLock::new(Vec::new())),
            default_duration: Arc::new(RwLock::new(60.0)),
            durations: Arc::new(RwLock::new(HashMap::new())),
            probe_failure: Arc::new(RwLock::new(None)),
            encode_outcome: Arc::new(RwLock::new(EncodeOutcome::success())),
            failing_inputs: Arc::new(RwLock::new(HashMap::new())),
            create_output: Arc::new(RwLock::new(true)),
            output_bytes: Arc::new(RwLock::new(b"mock encoder output".to_vec())),
            validate_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the duration reported for any path without its own entry.
    pub async fn set_duration(&self, secs: f64) {
        *self.default_duration.write().await = secs;
    }

    /// Set the duration reported for one path.
    pub async fn set_duration_for(&self, path: impl AsRef<Path>, secs: f64) {
        self.durations
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), secs);
    }

    /// Make every probe fail as if ffprobe exited non-zero.
    pub async fn fail_probe(&self, reason: impl Into<String>) {
        *self.probe_failure.write().await = Some(reason.into());
    }

    /// Make every encode exit with `code` and `stderr`.
    pub async fn set_encode_exit(&self, code: i32, stderr: impl Into<String>) {
        *self.encode_outcome.write().await = EncodeOutcome::failure(code, stderr);
    }

    /// Make encodes of one input exit with `code` and `stderr`.
    pub async fn fail_encode_for(&self, input: impl AsRef<Path>, code: i32, stderr: impl Into<String>) {
        self.failing_inputs
            .write()
            .await
            .insert(input.as_ref().to_path_buf(), EncodeOutcome::failure(code, stderr));
    }

    /// Choose whether successful encodes write the output file.
    pub async fn set_create_output(&self, create: bool) {
        *self.create_output.write().await = create;
    }

    /// Set the bytes written to output files.
    pub async fn set_output_bytes(&self, bytes: impl Into<Vec<u8>>) {
        *self.output_bytes.write().await = bytes.into();
    }

    /// Make the next `validate` call fail.
    pub async fn set_validate_error(&self, error: ShrinkError) {
        *self.validate_error.write().await = Some(error);
    }

    /// Get all recorded encode requests.
    pub async fn recorded_encodes(&self) -> Vec<EncodeRequest> {
        self.encodes.read().await.clone()
    }

    /// Get all probed paths.
    pub async fn recorded_probes(&self) -> Vec<PathBuf> {
        self.probes.read().await.clone()
    }

    pub async fn encode_count(&self) -> usize {
        self.encodes.read().await.len()
    }

    pub async fn probe_count(&self) -> usize {
        self.probes.read().await.len()
    }

    /// Clear recorded calls.
    pub async fn clear_recorded(&self) {
        self.encodes.write().await.clear();
        self.probes.write().await.clear();
    }
}

#[async_trait]
impl Toolchain for MockToolchain {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe_duration(&self, path: &Path) -> Result<f64, ShrinkError> {
        self.probes.write().await.push(path.to_path_buf());

        if let Some(reason) = self.probe_failure.read().await.as_ref() {
            return Err(ShrinkError::probe_failed(reason.clone()));
        }

        if let Some(secs) = self.durations.read().await.get(path) {
            return Ok(*secs);
        }

        Ok(*self.default_duration.read().await)
    }

    async fn encode(&self, request: &EncodeRequest) -> Result<EncodeOutcome, ShrinkError> {
        self.encodes.write().await.push(request.clone());

        let outcome = match self.failing_inputs.read().await.get(request.input_path()) {
            Some(outcome) => outcome.clone(),
            None => self.encode_outcome.read().await.clone(),
        };

        if outcome.is_success() && *self.create_output.read().await {
            let bytes = self.output_bytes.read().await.clone();
            tokio::fs::write(request.output_path(), bytes).await?;
        }

        Ok(outcome)
    }

    async fn validate(&self) -> Result<(), ShrinkError> {
        match self.validate_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
