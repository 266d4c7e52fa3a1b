use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clipsqueeze_core::{load_config_or_default, validate_config, Config};
use clipsqueeze_server::cli::{Cli, Invocation};
use clipsqueeze_server::commands;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = e.print();
                    ExitCode::SUCCESS
                }
                _ => {
                    println!("{}", e.render());
                    ExitCode::FAILURE
                }
            };
        }
    };

    let invocation = match cli.invocation() {
        Ok(Invocation::Usage) => {
            let _ = Cli::command().print_help();
            return ExitCode::SUCCESS;
        }
        Ok(invocation) => invocation,
        Err(message) => {
            println!("Error: {}", message);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&cli, &invocation);

    match run(&cli, invocation).await {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            println!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout is reserved for results and errors.
fn init_logging(cli: &Cli, invocation: &Invocation) {
    let default_filter = match (cli.verbose, invocation) {
        (true, _) => "clipsqueeze_core=debug,clipsqueeze_server=debug,tower_http=debug",
        (false, Invocation::Serve { .. }) => "info,tower_http=debug",
        (false, _) => "info",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    if let Some(path) = &cli.config {
        info!("Loading configuration from {}", path.display());
    }
    let mut config = load_config_or_default(cli.config.as_deref()).with_context(|| {
        match &cli.config {
            Some(path) => format!("Failed to load config from {}", path.display()),
            None => "Failed to load config".to_string(),
        }
    })?;

    if cli.timeout.is_some() {
        config.toolchain.timeout_secs = cli.timeout;
    }

    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

async fn run(cli: &Cli, invocation: Invocation) -> Result<ExitCode> {
    let mut config = load_config(cli)?;

    let outcome = match invocation {
        Invocation::Usage => return Ok(ExitCode::SUCCESS),
        Invocation::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            validate_config(&config).context("Configuration validation failed")?;

            let toolchain = commands::build_toolchain(&config, None);
            commands::serve(config, toolchain).await?;
            return Ok(ExitCode::SUCCESS);
        }
        Invocation::Compress {
            input,
            output,
            target,
        } => {
            let toolchain = commands::build_toolchain(&config, Some(commands::cancel_on_ctrl_c()));
            commands::compress(toolchain, &input, &output, target)
                .await
                .map(|report| commands::compress_summary(&report))
        }
        Invocation::ExtractAudio {
            input,
            output,
            bitrate_kbps,
        } => {
            let bitrate = bitrate_kbps.unwrap_or(config.extract.default_bitrate_kbps);
            let toolchain = commands::build_toolchain(&config, Some(commands::cancel_on_ctrl_c()));
            commands::extract_audio(toolchain, &input, &output, bitrate)
                .await
                .map(|report| commands::extract_summary(&report))
        }
    };

    match outcome {
        Ok(summary) => {
            println!("{}", summary);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(kind = e.kind(), "Operation failed");
            println!("Error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
