use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Toolchain timeout, when set, is not 0
/// - Default extraction bitrate is not 0
/// - Browser video extension is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.toolchain.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "toolchain.timeout_secs cannot be 0 (omit it to wait without a limit)".to_string(),
        ));
    }

    if config.extract.default_bitrate_kbps == 0 {
        return Err(ConfigError::ValidationError(
            "extract.default_bitrate_kbps cannot be 0".to_string(),
        ));
    }

    if config.browser.video_extension.trim_start_matches('.').trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "browser.video_extension cannot be empty".to_string(),
        ));
    }

    Ok(())
}
