//! Types for the toolchain module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Audio codec handed to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCodec {
    /// Advanced Audio Coding, used inside compressed MP4s.
    Aac,
    /// MPEG Audio Layer III, used for extracted tracks.
    Mp3,
}

impl AudioCodec {
    /// Returns the ffmpeg encoder name for this codec.
    pub fn ffmpeg_codec(&self) -> &'static str {
        match self {
            Self::Aac => "aac",
            Self::Mp3 => "libmp3lame",
        }
    }

    /// Returns the file extension for a standalone file of this codec.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Aac => "m4a",
            Self::Mp3 => "mp3",
        }
    }
}

/// Video codec handed to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    /// H.264 / AVC
    H264,
}

impl VideoCodec {
    /// Returns the ffmpeg encoder name for this codec.
    pub fn ffmpeg_codec(&self) -> &'static str {
        match self {
            Self::H264 => "libx264",
        }
    }
}

/// Audio stream settings for one encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSettings {
    pub codec: AudioCodec,
    pub bitrate_kbps: u32,
}

/// Video stream settings for one encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSettings {
    pub codec: VideoCodec,
    pub bitrate_kbps: u32,
}

/// A single encoder invocation.
///
/// Both variants overwrite whatever already exists at `output_path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EncodeRequest {
    /// Re-encode video and audio at fixed average bitrates.
    Compress {
        input_path: PathBuf,
        output_path: PathBuf,
        video: VideoSettings,
        audio: AudioSettings,
        /// Move the index to the front of the file for progressive playback.
        faststart: bool,
    },
    /// Drop the video stream and encode the audio.
    ExtractAudio {
        input_path: PathBuf,
        output_path: PathBuf,
        audio: AudioSettings,
    },
}

impl EncodeRequest {
    pub fn input_path(&self) -> &Path {
        match self {
            Self::Compress { input_path, .. } | Self::ExtractAudio { input_path, .. } => input_path,
        }
    }

    pub fn output_path(&self) -> &Path {
        match self {
            Self::Compress { output_path, .. } | Self::ExtractAudio { output_path, .. } => {
                output_path
            }
        }
    }

    pub fn audio(&self) -> &AudioSettings {
        match self {
            Self::Compress { audio, .. } | Self::ExtractAudio { audio, .. } => audio,
        }
    }
}

/// What the encoder process reported back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodeOutcome {
    /// Exit code, `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard error.
    pub stderr: String,
}

impl EncodeOutcome {
    pub fn success() -> Self {
        Self {
            exit_code: Some(0),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_codec_names() {
        assert_eq!(AudioCodec::Aac.ffmpeg_codec(), "aac");
        assert_eq!(AudioCodec::Mp3.ffmpeg_codec(), "libmp3lame");
        assert_eq!(AudioCodec::Mp3.extension(), "mp3");
    }

    #[test]
    fn test_video_codec_names() {
        assert_eq!(VideoCodec::H264.ffmpeg_codec(), "libx264");
    }

    #[test]
    fn test_request_accessors() {
        let request = EncodeRequest::ExtractAudio {
            input_path: PathBuf::from("/in/talk.mp4"),
            output_path: PathBuf::from("/out/talk.mp3"),
            audio: AudioSettings {
                codec: AudioCodec::Mp3,
                bitrate_kbps: 192,
            },
        };
        assert_eq!(request.input_path(), Path::new("/in/talk.mp4"));
        assert_eq!(request.output_path(), Path::new("/out/talk.mp3"));
        assert_eq!(request.audio().bitrate_kbps, 192);
    }

    #[test]
    fn test_outcome_success() {
        assert!(EncodeOutcome::success().is_success());
        assert!(!EncodeOutcome::failure(1, "boom").is_success());
        assert!(!EncodeOutcome::default().is_success());
    }

    #[test]
    fn test_request_serializes_with_tag() {
        let request = EncodeRequest::ExtractAudio {
            input_path: PathBuf::from("a.mp4"),
            output_path: PathBuf::from("a.mp3"),
            audio: AudioSettings {
                codec: AudioCodec::Mp3,
                bitrate_kbps: 128,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "extract_audio");
        assert_eq!(json["audio"]["codec"], "mp3");
    }
}
