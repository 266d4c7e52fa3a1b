//! Local file browser backing the web interface.
//!
//! Lists directories for picking inputs, stores uploaded files under a
//! reserved directory, and runs batch extractions as a plain ordered loop.

mod batch;
mod error;
mod listing;
mod types;
mod upload;

pub use batch::{audio_output_path, extract_batch};
pub use error::BrowseError;
pub use listing::{has_extension, list_directory};
pub use types::{BatchItemResult, BrowseItem, BrowseListing, ItemKind};
pub use upload::{sanitize_filename, PendingUpload, UploadStore};
