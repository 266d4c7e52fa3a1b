//! File upload API handler.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResponse {
    fn stored(path: PathBuf) -> Self {
        Self {
            success: true,
            path: Some(path.to_string_lossy().to_string()),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        let error = error.into();
        warn!("Upload failed: {}", error);
        Self {
            success: false,
            path: None,
            error: Some(error),
        }
    }
}

/// POST /api/upload
///
/// Stores the multipart field `file` in the uploads directory, streaming it to
/// disk chunk by chunk. A stored file of the same name is replaced only once
/// the whole body has arrived.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Json<UploadResponse> {
    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Json(UploadResponse::failed(format!("Invalid upload: {}", e))),
        };

        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        if original_name.is_empty() {
            return Json(UploadResponse::failed("No file selected"));
        }

        // Dropping `pending` on any early return discards the partial file
        let mut pending = match state.uploads().begin(&original_name).await {
            Ok(pending) => pending,
            Err(e) => return Json(UploadResponse::failed(format!("Failed to store file: {}", e))),
        };

        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    if let Err(e) = pending.write(&chunk).await {
                        return Json(UploadResponse::failed(format!(
                            "Failed to store file: {}",
                            e
                        )));
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    return Json(UploadResponse::failed(format!("Failed to read file: {}", e)))
                }
            }
        }

        return match pending.commit().await {
            Ok((path, written)) => {
                info!("Stored upload {} ({} bytes)", path.display(), written);
                Json(UploadResponse::stored(path))
            }
            Err(e) => Json(UploadResponse::failed(format!("Failed to store file: {}", e))),
        };
    }

    Json(UploadResponse::failed("No file part"))
}
