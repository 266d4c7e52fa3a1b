use std::sync::Arc;

use clipsqueeze_core::{Config, Extractor, Toolchain, UploadStore};

/// Shared application state
pub struct AppState {
    config: Config,
    toolchain: Arc<dyn Toolchain>,
    uploads: UploadStore,
}

impl AppState {
    pub fn new(config: Config, toolchain: Arc<dyn Toolchain>) -> Self {
        let uploads = UploadStore::new(config.browser.uploads_dir.clone());
        Self {
            config,
            toolchain,
            uploads,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn extractor(&self) -> Extractor {
        Extractor::new(Arc::clone(&self.toolchain))
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.uploads
    }
}
