//! Directory listing for the file browser.

use std::cmp::Ordering;
use std::path::Path;

use super::error::BrowseError;
use super::types::{BrowseItem, BrowseListing, ItemKind};

/// Whether `path` has `extension`, ignoring ASCII case.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension.trim_start_matches('.')))
}

fn compare_items(a: &BrowseItem, b: &BrowseItem) -> Ordering {
    let rank = |item: &BrowseItem| match item.kind {
        ItemKind::Directory => 0,
        ItemKind::File => 1,
    };
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}

/// Lists subdirectories and files ending in `video_extension` under `path`.
///
/// Symlinks are followed; entries that cannot be stat'ed are skipped.
pub async fn list_directory(
    path: &Path,
    video_extension: &str,
) -> Result<BrowseListing, BrowseError> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| BrowseError::from_io(path, e))?;
    if !meta.is_dir() {
        return Err(BrowseError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    let current = tokio::fs::canonicalize(path)
        .await
        .unwrap_or_else(|_| path.to_path_buf());

    let mut entries = tokio::fs::read_dir(&current)
        .await
        .map_err(|e| BrowseError::from_io(&current, e))?;

    let mut items = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| BrowseError::from_io(&current, e))?
    {
        let entry_path = entry.path();
        let Ok(entry_meta) = tokio::fs::metadata(&entry_path).await else {
            continue;
        };

        let kind = if entry_meta.is_dir() {
            ItemKind::Directory
        } else if entry_meta.is_file() && has_extension(&entry_path, video_extension) {
            ItemKind::File
        } else {
            continue;
        };

        items.push(BrowseItem {
            name: entry.file_name().to_string_lossy().to_string(),
            path: entry_path.to_string_lossy().to_string(),
            kind,
        });
    }

    items.sort_by(compare_items);

    Ok(BrowseListing {
        current_path: current.to_string_lossy().to_string(),
        items,
    })
}
