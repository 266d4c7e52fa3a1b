use clap::{Args, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

use clipsqueeze_core::TargetSize;

#[derive(Parser, Debug)]
#[command(name = "clipsqueeze")]
#[command(version, about = "Shrink a video to a target size or pull out its audio track")]
#[command(after_help = "Examples:\n  \
    clipsqueeze compress input.mp4 output.mp4 100\n  \
    clipsqueeze input.mp4 output.mp4 --size 25\n  \
    clipsqueeze input.mp4 talk --audio-only --audio-bitrate 128\n  \
    clipsqueeze serve --port 5000")]
pub struct Cli {
    /// Path to config file
    #[arg(long, global = true, env = "CLIPSQUEEZE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Kill ffmpeg/ffprobe if a single run takes longer than this
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub convert: ConvertArgs,
}

/// Flag-driven form: `clipsqueeze <input> <output> (--size N | --audio-only)`.
#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    /// Input video file
    pub input: Option<PathBuf>,

    /// Output file
    pub output: Option<PathBuf>,

    /// Target output size in megabytes
    #[arg(long, value_name = "MB")]
    pub size: Option<String>,

    /// Extract the audio track instead of compressing
    #[arg(long)]
    pub audio_only: bool,

    /// Audio bitrate for --audio-only [default: 192]
    #[arg(long, value_name = "KBPS")]
    pub audio_bitrate: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Re-encode a video so it lands near a target size
    Compress {
        /// Input video file
        input: PathBuf,

        /// Output video file
        output: PathBuf,

        /// Target output size in megabytes
        #[arg(value_name = "TARGET_SIZE_MB")]
        target_size: String,
    },

    /// Start the local web interface for browsing and converting files
    Serve {
        /// Address to bind to
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// What the command line asked for, after validation.
#[derive(Debug, PartialEq)]
pub enum Invocation {
    /// Nothing was given; print usage.
    Usage,
    Compress {
        input: PathBuf,
        output: PathBuf,
        target: TargetSize,
    },
    /// `bitrate_kbps` is `None` when the configured default should be used.
    ExtractAudio {
        input: PathBuf,
        output: PathBuf,
        bitrate_kbps: Option<u32>,
    },
    Serve {
        host: Option<IpAddr>,
        port: Option<u16>,
    },
}

/// Parses an audio bitrate in kbps.
pub fn parse_bitrate(value: &str) -> Result<u32, String> {
    let kbps: i64 = value
        .trim()
        .parse()
        .map_err(|_| "Audio bitrate must be a valid number.".to_string())?;
    if kbps <= 0 {
        return Err("Audio bitrate must be a positive number.".to_string());
    }
    u32::try_from(kbps).map_err(|_| "Audio bitrate is too large.".to_string())
}

fn parse_target(value: &str) -> Result<TargetSize, String> {
    value.parse::<TargetSize>().map_err(|e| e.to_string())
}

impl Cli {
    /// Checks the parsed arguments and turns them into an [`Invocation`].
    ///
    /// The error is a message meant to be shown to the user as is.
    pub fn invocation(&self) -> Result<Invocation, String> {
        match &self.command {
            Some(Commands::Compress {
                input,
                output,
                target_size,
            }) => Ok(Invocation::Compress {
                input: input.clone(),
                output: output.clone(),
                target: parse_target(target_size)?,
            }),
            Some(Commands::Serve { host, port }) => Ok(Invocation::Serve {
                host: *host,
                port: *port,
            }),
            None => self.convert.invocation(),
        }
    }
}

impl ConvertArgs {
    fn is_empty(&self) -> bool {
        self.input.is_none()
            && self.output.is_none()
            && self.size.is_none()
            && !self.audio_only
            && self.audio_bitrate.is_none()
    }

    fn invocation(&self) -> Result<Invocation, String> {
        if self.is_empty() {
            return Ok(Invocation::Usage);
        }

        let (Some(input), Some(output)) = (&self.input, &self.output) else {
            return Err("Both an input and an output path are required.".to_string());
        };

        match (&self.size, self.audio_only) {
            (Some(_), true) => Err("Use either --size or --audio-only, not both.".to_string()),
            (None, false) => Err("Either --size or --audio-only is required.".to_string()),
            (Some(size), false) => Ok(Invocation::Compress {
                input: input.clone(),
                output: output.clone(),
                target: parse_target(size)?,
            }),
            (None, true) => Ok(Invocation::ExtractAudio {
                input: input.clone(),
                output: output.clone(),
                bitrate_kbps: self.audio_bitrate.as_deref().map(parse_bitrate).transpose()?,
            }),
        }
    }
}
