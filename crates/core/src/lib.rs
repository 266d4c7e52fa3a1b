pub mod browser;
pub mod budget;
pub mod config;
pub mod ops;
pub mod testing;
pub mod toolchain;

pub use browser::{
    extract_batch, list_directory, BatchItemResult, BrowseError, BrowseItem, BrowseListing,
    PendingUpload, UploadStore,
};
pub use budget::{BitrateBudget, TargetSize, RESERVED_AUDIO_BITRATE_BPS};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError,
};
pub use ops::{Compressor, Extractor, OperationReport, DEFAULT_AUDIO_BITRATE_KBPS};
pub use toolchain::{FfmpegToolchain, ShrinkError, Toolchain, ToolchainConfig};
