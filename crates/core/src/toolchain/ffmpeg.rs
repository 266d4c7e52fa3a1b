//! FFmpeg/FFprobe-based toolchain implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::{Child, Command};
use tokio::time::{timeout, Duration};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::config::ToolchainConfig;
use super::error::ShrinkError;
use super::traits::Toolchain;
use super::types::{EncodeOutcome, EncodeRequest};

#[derive(Debug, Clone, Copy)]
enum Tool {
    Ffmpeg,
    Ffprobe,
}

/// Toolchain that shells out to ffmpeg and ffprobe.
pub struct FfmpegToolchain {
    config: ToolchainConfig,
    cancel: Option<CancellationToken>,
}

impl FfmpegToolchain {
    /// Creates a new toolchain with the given configuration.
    pub fn new(config: ToolchainConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Creates a toolchain with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ToolchainConfig::default())
    }

    /// Kills any running child and fails with [`ShrinkError::Cancelled`] once
    /// `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &ToolchainConfig {
        &self.config
    }

    /// Builds ffprobe arguments that print only the first video stream's duration.
    fn build_probe_args(path: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-select_streams".to_string(),
            "v:0".to_string(),
            "-show_entries".to_string(),
            "stream=duration".to_string(),
            "-of".to_string(),
            "default=noprint_wrappers=1:nokey=1".to_string(),
            path.to_string_lossy().to_string(),
        ]
    }

    /// Builds ffmpeg arguments for one encode request.
    fn build_encode_args(&self, request: &EncodeRequest) -> Vec<String> {
        let mut args = vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
            "-i".to_string(),
            request.input_path().to_string_lossy().to_string(),
        ];

        match request {
            EncodeRequest::Compress {
                video,
                audio,
                faststart,
                ..
            } => {
                args.extend([
                    "-c:v".to_string(),
                    video.codec.ffmpeg_codec().to_string(),
                    "-b:v".to_string(),
                    format!("{}k", video.bitrate_kbps),
                    "-c:a".to_string(),
                    audio.codec.ffmpeg_codec().to_string(),
                    "-b:a".to_string(),
                    format!("{}k", audio.bitrate_kbps),
                ]);
                if *faststart {
                    args.extend(["-movflags".to_string(), "+faststart".to_string()]);
                }
            }
            EncodeRequest::ExtractAudio { audio, .. } => {
                args.extend([
                    "-vn".to_string(),
                    "-c:a".to_string(),
                    audio.codec.ffmpeg_codec().to_string(),
                    "-b:a".to_string(),
                    format!("{}k", audio.bitrate_kbps),
                ]);
            }
        }

        args.extend(self.config.extra_ffmpeg_args.iter().cloned());

        // Overwrite output
        args.push("-y".to_string());
        args.push(request.output_path().to_string_lossy().to_string());

        args
    }

    /// Parses the bare duration ffprobe prints for `stream=duration`.
    fn parse_duration(stdout: &str) -> Result<f64, ShrinkError> {
        let text = stdout.lines().next().unwrap_or("").trim();
        if text.is_empty() {
            return Err(ShrinkError::probe_failed("ffprobe printed no duration"));
        }

        let duration = text.parse::<f64>().map_err(|_| {
            ShrinkError::probe_failed(format!("unparseable duration '{}'", text))
        })?;

        if !duration.is_finite() || duration <= 0.0 {
            return Err(ShrinkError::probe_failed(format!(
                "duration must be a positive number, got '{}'",
                text
            )));
        }

        Ok(duration)
    }

    fn spawn(&self, tool: Tool, args: &[String]) -> Result<Child, ShrinkError> {
        let program = match tool {
            Tool::Ffmpeg => &self.config.ffmpeg_path,
            Tool::Ffprobe => &self.config.ffprobe_path,
        };

        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    match tool {
                        Tool::Ffmpeg => ShrinkError::FfmpegNotFound {
                            path: program.clone(),
                        },
                        Tool::Ffprobe => ShrinkError::FfprobeNotFound {
                            path: program.clone(),
                        },
                    }
                } else {
                    ShrinkError::Io(e)
                }
            })
    }

    /// Waits for the child, honouring the optional timeout and cancellation token.
    ///
    /// Losing either race drops the child, and `kill_on_drop` kills it.
    async fn wait(&self, child: Child) -> Result<Output, ShrinkError> {
        let cancelled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };

        let finished = async {
            let wait = child.wait_with_output();
            match self.config.timeout_secs {
                Some(secs) => timeout(Duration::from_secs(secs), wait)
                    .await
                    .map_err(|_| ShrinkError::Timeout { timeout_secs: secs })?
                    .map_err(ShrinkError::Io),
                None => wait.await.map_err(ShrinkError::Io),
            }
        };

        tokio::select! {
            result = finished => result,
            _ = cancelled => Err(ShrinkError::Cancelled),
        }
    }

    async fn run(&self, tool: Tool, args: &[String]) -> Result<Output, ShrinkError> {
        debug!(?tool, ?args, "Spawning external tool");
        let child = self.spawn(tool, args)?;
        self.wait(child).await
    }

    async fn check_version(&self, tool: Tool) -> Result<(), ShrinkError> {
        self.run(tool, &["-version".to_string()]).await.map(|_| ())
    }
}

#[async_trait]
impl Toolchain for FfmpegToolchain {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn probe_duration(&self, path: &Path) -> Result<f64, ShrinkError> {
        let output = self.run(Tool::Ffprobe, &Self::build_probe_args(path)).await?;

        if !output.status.success() {
            return Err(ShrinkError::probe_failed(format!(
                "ffprobe exited with code {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Self::parse_duration(&String::from_utf8_lossy(&output.stdout))
    }

    async fn encode(&self, request: &EncodeRequest) -> Result<EncodeOutcome, ShrinkError> {
        let args = self.build_encode_args(request);
        let output = self.run(Tool::Ffmpeg, &args).await?;

        Ok(EncodeOutcome {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        })
    }

    async fn validate(&self) -> Result<(), ShrinkError> {
        self.check_version(Tool::Ffmpeg).await?;
        self.check_version(Tool::Ffprobe).await
    }
}
