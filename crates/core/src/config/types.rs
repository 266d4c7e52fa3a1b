use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::ops::DEFAULT_AUDIO_BITRATE_KBPS;
use crate::toolchain::ToolchainConfig;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory with the web UI, served for any non-API path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
    /// Largest accepted upload body.
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        usize::try_from(self.max_upload_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([127, 0, 0, 1])
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_mb() -> u64 {
    2048
}

/// File browser configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BrowserConfig {
    /// Directory listed when a browse request names no path.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Where uploaded files are stored.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
    /// Extension of files shown in listings.
    #[serde(default = "default_video_extension")]
    pub video_extension: String,
    /// Where converted audio goes. Next to the input when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            uploads_dir: default_uploads_dir(),
            video_extension: default_video_extension(),
            output_dir: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_video_extension() -> String {
    "mp4".to_string()
}

/// Audio extraction configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExtractConfig {
    #[serde(default = "default_bitrate_kbps")]
    pub default_bitrate_kbps: u32,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            default_bitrate_kbps: default_bitrate_kbps(),
        }
    }
}

fn default_bitrate_kbps() -> u32 {
    DEFAULT_AUDIO_BITRATE_KBPS
}
