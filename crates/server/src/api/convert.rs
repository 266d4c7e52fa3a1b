//! Audio conversion API handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use clipsqueeze_core::browser::audio_output_path;
use clipsqueeze_core::{extract_batch, BatchItemResult};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for converting one file
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub input_path: PathBuf,
    /// Falls back to the configured default
    pub audio_bitrate_kbps: Option<u32>,
}

/// Outcome of a single conversion
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request body for converting several files, one after another
#[derive(Debug, Deserialize)]
pub struct BatchConvertRequest {
    pub input_paths: Vec<PathBuf>,
    pub audio_bitrate_kbps: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct BatchConvertResponse {
    pub results: Vec<BatchItemResult>,
    pub succeeded: usize,
    pub failed: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/convert
///
/// Extracts the audio track of one video. Failures are reported in the body
/// with `success: false`, never as an HTTP error status.
pub async fn convert(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConvertRequest>,
) -> Json<ConvertResponse> {
    let config = state.config();
    let bitrate = request
        .audio_bitrate_kbps
        .unwrap_or(config.extract.default_bitrate_kbps);
    let output = audio_output_path(&request.input_path, config.browser.output_dir.as_deref());

    match state
        .extractor()
        .extract(&request.input_path, &output, bitrate)
        .await
    {
        Ok(report) => {
            info!(
                "Converted {} -> {}",
                report.input_path.display(),
                report.output_path.display()
            );
            Json(ConvertResponse {
                success: true,
                output_path: Some(report.output_path),
                output_size_bytes: Some(report.output_size_bytes),
                error: None,
            })
        }
        Err(e) => {
            warn!(kind = e.kind(), "Conversion failed: {}", e);
            Json(ConvertResponse {
                success: false,
                output_path: None,
                output_size_bytes: None,
                error: Some(e.to_string()),
            })
        }
    }
}

/// POST /api/convert/batch
pub async fn convert_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchConvertRequest>,
) -> Json<BatchConvertResponse> {
    let config = state.config();
    let bitrate = request
        .audio_bitrate_kbps
        .unwrap_or(config.extract.default_bitrate_kbps);

    let results = extract_batch(
        &state.extractor(),
        &request.input_paths,
        config.browser.output_dir.as_deref(),
        bitrate,
    )
    .await;

    let succeeded = results.iter().filter(|r| r.success).count();
    let failed = results.len() - succeeded;
    info!("Batch finished: {} succeeded, {} failed", succeeded, failed);

    Json(BatchConvertResponse {
        results,
        succeeded,
        failed,
    })
}
