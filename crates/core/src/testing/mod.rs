//! Testing utilities and mock implementations.
//!
//! This module provides a mock of the [`crate::toolchain::Toolchain`] trait so
//! the operations and the HTTP facade can be exercised without ffmpeg.
//!
//! # Example
//!
//! ```rust,ignore
//! use clipsqueeze_core::testing::{fixtures, MockToolchain};
//!
//! let dir = tempfile::TempDir::new()?;
//! let input = fixtures::video_file(dir.path(), "holiday.mp4");
//!
//! let toolchain = Arc::new(MockToolchain::new());
//! toolchain.set_duration(120.0).await;
//! ```

mod mock_toolchain;

pub use mock_toolchain::MockToolchain;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    /// Write a small placeholder file that stands in for a video.
    pub fn video_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, vec![0u8; 2048]).expect("Failed to write fixture video");
        path
    }

    /// Create a directory tree under `dir` from `(relative path, is_dir)` pairs.
    pub fn tree(dir: &Path, entries: &[(&str, bool)]) {
        for (rel, is_dir) in entries {
            let path = dir.join(rel);
            if *is_dir {
                std::fs::create_dir_all(&path).expect("Failed to create fixture dir");
            } else {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).expect("Failed to create fixture dir");
                }
                std::fs::write(&path, b"fixture").expect("Failed to write fixture file");
            }
        }
    }
}
