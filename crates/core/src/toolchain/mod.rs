//! Toolchain module wrapping the external prober and encoder.
//!
//! The compressor and extractor never spawn processes directly; they go
//! through the [`Toolchain`] trait. [`FfmpegToolchain`] is the real
//! implementation, [`crate::testing::MockToolchain`] the test double.
//!
//! # Example
//!
//! ```ignore
//! use clipsqueeze_core::toolchain::{FfmpegToolchain, Toolchain, ToolchainConfig};
//!
//! let toolchain = FfmpegToolchain::new(ToolchainConfig::default().with_timeout(3600));
//!
//! // Validate ffmpeg and ffprobe are available
//! toolchain.validate().await?;
//!
//! let secs = toolchain.probe_duration(Path::new("/videos/holiday.mp4")).await?;
//! println!("Duration: {} seconds", secs);
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::ToolchainConfig;
pub use error::ShrinkError;
pub use ffmpeg::FfmpegToolchain;
pub use traits::Toolchain;
pub use types::{
    AudioCodec, AudioSettings, EncodeOutcome, EncodeRequest, VideoCodec, VideoSettings,
};
