//! Storage for files uploaded through the browser.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Name used when nothing survives sanitizing.
const FALLBACK_NAME: &str = "upload";

/// Reduces an uploaded file name to a safe single path component.
///
/// Only ASCII letters and digits, `.`, `_`, `-` and space are kept. Leading
/// dots are dropped so the result can never be `..` or a hidden file.
pub fn sanitize_filename(name: &str) -> String {
    // Browsers on Windows may send the full client path
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let kept: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | ' '))
        .collect();

    let trimmed = kept.trim().trim_start_matches('.').trim();
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Distinguishes concurrent uploads of the same name.
static PART_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Writes uploads into a single reserved directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path an upload called `original_name` will be stored at.
    pub fn destination(&self, original_name: &str) -> PathBuf {
        self.dir.join(sanitize_filename(original_name))
    }

    /// Starts an upload, creating the uploads directory if needed.
    ///
    /// Bytes go to a hidden part file next to the destination. A file already
    /// stored under the same name is only replaced by [`PendingUpload::commit`].
    pub async fn begin(&self, original_name: &str) -> io::Result<PendingUpload> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let destination = self.destination(original_name);
        let part_name = format!(
            ".{}.{}-{}.part",
            sanitize_filename(original_name),
            std::process::id(),
            PART_COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        let part_path = self.dir.join(part_name);
        let file = File::create(&part_path).await?;

        Ok(PendingUpload {
            destination,
            part_path,
            file,
            written: 0,
            committed: false,
        })
    }
}

/// An upload being written. Dropping it without [`commit`](Self::commit)
/// removes the part file and leaves the destination untouched.
#[derive(Debug)]
pub struct PendingUpload {
    destination: PathBuf,
    part_path: PathBuf,
    file: File,
    written: u64,
    committed: bool,
}

impl PendingUpload {
    pub async fn write(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Flushes the part file and moves it over the destination. Returns the
    /// stored path and the number of bytes written.
    pub async fn commit(mut self) -> io::Result<(PathBuf, u64)> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        tokio::fs::rename(&self.part_path, &self.destination).await?;
        self.committed = true;
        Ok((self.destination.clone(), self.written))
    }
}

impl Drop for PendingUpload {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = std::fs::remove_file(&self.part_path) {
                debug!("Could not remove {}: {}", self.part_path.display(), e);
            }
        }
    }
}
