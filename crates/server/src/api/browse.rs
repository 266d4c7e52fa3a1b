//! Directory browsing API handler.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use clipsqueeze_core::{list_directory, BrowseItem, BrowseListing};

use crate::state::AppState;

/// Query parameters for browsing
#[derive(Debug, Deserialize)]
pub struct BrowseParams {
    /// Directory to list. The configured root when absent or empty.
    pub path: Option<String>,
}

/// A listing, or the error that prevented one
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowseResponse {
    Listing(BrowseListing),
    Error {
        error: String,
        current_path: String,
        items: Vec<BrowseItem>,
    },
}

/// GET /api/browse
pub async fn browse(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BrowseParams>,
) -> Json<BrowseResponse> {
    let path = params
        .path
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| state.config().browser.root.clone());

    debug!("Browsing {}", path.display());
    match list_directory(&path, &state.config().browser.video_extension).await {
        Ok(listing) => Json(BrowseResponse::Listing(listing)),
        Err(e) => {
            warn!("Browse failed: {}", e);
            Json(BrowseResponse::Error {
                error: e.to_string(),
                current_path: path.to_string_lossy().to_string(),
                items: Vec::new(),
            })
        }
    }
}
