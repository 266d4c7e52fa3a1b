//! Trait definitions for the toolchain module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ShrinkError;
use super::types::{EncodeOutcome, EncodeRequest};

/// The external prober/encoder pair.
///
/// Operations talk to the media tools only through this trait, so tests can
/// swap in [`crate::testing::MockToolchain`] without spawning processes.
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Returns the name of this toolchain implementation.
    fn name(&self) -> &str;

    /// Returns the duration of the first video stream in seconds.
    ///
    /// Fails with [`ShrinkError::ProbeFailed`] when the prober exits non-zero
    /// or its output is not a finite positive number.
    async fn probe_duration(&self, path: &Path) -> Result<f64, ShrinkError>;

    /// Runs the encoder once and reports how it exited.
    ///
    /// A non-zero exit is not an `Err` here; the caller decides what it
    /// means. `Err` is reserved for failing to run the process at all.
    async fn encode(&self, request: &EncodeRequest) -> Result<EncodeOutcome, ShrinkError>;

    /// Checks that the underlying binaries can be executed.
    async fn validate(&self) -> Result<(), ShrinkError>;
}
