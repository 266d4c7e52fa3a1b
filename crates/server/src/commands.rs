//! What each CLI invocation does once arguments and config are settled.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use clipsqueeze_core::{
    Compressor, Config, Extractor, FfmpegToolchain, OperationReport, ShrinkError, TargetSize,
    Toolchain,
};

use crate::api::create_router;
use crate::state::AppState;

/// Builds the ffmpeg-backed toolchain from config.
pub fn build_toolchain(config: &Config, cancel: Option<CancellationToken>) -> Arc<dyn Toolchain> {
    let toolchain = FfmpegToolchain::new(config.toolchain.clone());
    match cancel {
        Some(token) => Arc::new(toolchain.with_cancellation(token)),
        None => Arc::new(toolchain),
    }
}

/// Returns a token that is cancelled on Ctrl+C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping external tools");
            child.cancel();
        }
    });
    token
}

pub async fn compress(
    toolchain: Arc<dyn Toolchain>,
    input: &Path,
    output: &Path,
    target: TargetSize,
) -> Result<OperationReport, ShrinkError> {
    Compressor::new(toolchain).compress(input, output, target).await
}

pub async fn extract_audio(
    toolchain: Arc<dyn Toolchain>,
    input: &Path,
    output: &Path,
    bitrate_kbps: u32,
) -> Result<OperationReport, ShrinkError> {
    Extractor::new(toolchain).extract(input, output, bitrate_kbps).await
}

/// Text printed after a successful compression.
pub fn compress_summary(report: &OperationReport) -> String {
    format!(
        "Compression complete!\nOutput: {}\nActual output size: {:.2} MB",
        report.output_path.display(),
        report.output_size_mb()
    )
}

/// Text printed after a successful extraction.
pub fn extract_summary(report: &OperationReport) -> String {
    format!(
        "Audio extraction complete!\nOutput: {}\nOutput size: {:.2} MB",
        report.output_path.display(),
        report.output_size_mb()
    )
}

/// Runs the web interface until Ctrl+C or SIGTERM.
pub async fn serve(config: Config, toolchain: Arc<dyn Toolchain>) -> Result<()> {
    if let Err(e) = toolchain.validate().await {
        warn!("Toolchain check failed, conversions will not work: {}", e);
    }

    info!("Browser root: {}", config.browser.root.display());
    info!("Uploads directory: {}", config.browser.uploads_dir.display());
    if let Some(dir) = &config.server.static_dir {
        info!("Serving web UI from {}", dir.display());
    }

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, toolchain));
    let app = create_router(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
