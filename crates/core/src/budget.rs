//! Bitrate budgeting for size-targeted compression.
//!
//! The whole budget is the target size spread evenly over the duration. A fixed
//! slice of it is reserved for audio and the rest goes to video. Single-pass
//! average-bitrate encoding only lands near the target, never exactly on it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::toolchain::ShrinkError;

/// Audio bitrate reserved out of every budget, in bits per second.
pub const RESERVED_AUDIO_BITRATE_BPS: f64 = 128_000.0;

/// Bytes per megabyte as used for target sizes.
pub const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Converts megabytes to bits.
pub fn megabytes_to_bits(megabytes: f64) -> f64 {
    megabytes * 8.0 * BYTES_PER_MEGABYTE
}

/// Desired output size in megabytes. Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TargetSize(f64);

impl TargetSize {
    pub fn from_megabytes(megabytes: f64) -> Result<Self, ShrinkError> {
        if !megabytes.is_finite() || megabytes <= 0.0 {
            return Err(ShrinkError::invalid_argument(
                "Target size must be a positive number.",
            ));
        }
        Ok(Self(megabytes))
    }

    pub fn megabytes(&self) -> f64 {
        self.0
    }

    pub fn bits(&self) -> f64 {
        megabytes_to_bits(self.0)
    }
}

impl FromStr for TargetSize {
    type Err = ShrinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let megabytes = s
            .trim()
            .parse::<f64>()
            .map_err(|_| ShrinkError::invalid_argument("Target size must be a valid number."))?;
        Self::from_megabytes(megabytes)
    }
}

impl TryFrom<f64> for TargetSize {
    type Error = ShrinkError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_megabytes(value)
    }
}

impl From<TargetSize> for f64 {
    fn from(size: TargetSize) -> Self {
        size.0
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} MB", self.0)
    }
}

/// Split of a total bit budget between audio and video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BitrateBudget {
    /// Everything the target size allows, bits per second.
    pub total_bps: f64,
    /// Reserved for the audio stream, bits per second.
    pub audio_bps: f64,
    /// What is left for video, bits per second. Always at least 1 kbps.
    pub video_bps: f64,
}

impl BitrateBudget {
    /// Allocates a budget for `duration_secs` of media squeezed into `target`.
    pub fn allocate(target: TargetSize, duration_secs: f64) -> Result<Self, ShrinkError> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(ShrinkError::probe_failed(format!(
                "duration must be a positive number, got {}",
                duration_secs
            )));
        }

        let total_bps = target.bits() / duration_secs;
        let audio_bps = RESERVED_AUDIO_BITRATE_BPS;
        let video_bps = total_bps - audio_bps;

        // A budget under 1 kbps would be passed to the encoder as "-b:v 0k"
        if video_bps <= 0.0 || bps_to_kbps(video_bps) == 0 {
            return Err(ShrinkError::TargetTooSmall {
                total_bps,
                audio_bps,
            });
        }

        Ok(Self {
            total_bps,
            audio_bps,
            video_bps,
        })
    }

    /// Video bitrate in whole kbps, truncated.
    pub fn video_kbps(&self) -> u32 {
        bps_to_kbps(self.video_bps)
    }

    /// Audio bitrate in whole kbps, truncated.
    pub fn audio_kbps(&self) -> u32 {
        bps_to_kbps(self.audio_bps)
    }
}

fn bps_to_kbps(bps: f64) -> u32 {
    (bps / 1000.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_megabytes_to_bits() {
        assert_eq!(megabytes_to_bits(1.0), 8_388_608.0);
        assert_eq!(megabytes_to_bits(10.0), 83_886_080.0);
    }

    #[test]
    fn test_allocate_ten_megabytes_over_two_minutes() {
        let target = TargetSize::from_megabytes(10.0).unwrap();
        let budget = BitrateBudget::allocate(target, 120.0).unwrap();

        assert!((budget.total_bps - 699_050.666).abs() < 0.01);
        assert!((budget.video_bps - 571_050.666).abs() < 0.01);
        assert_eq!(budget.audio_bps, 128_000.0);
        assert_eq!(budget.video_kbps(), 571);
        assert_eq!(budget.audio_kbps(), 128);
    }

    #[test]
    fn test_allocate_target_too_small() {
        let target = TargetSize::from_megabytes(1.0).unwrap();
        let err = BitrateBudget::allocate(target, 600.0).unwrap_err();

        match err {
            ShrinkError::TargetTooSmall {
                total_bps,
                audio_bps,
            } => {
                assert!((total_bps - 13_981.01).abs() < 0.01);
                assert_eq!(audio_bps, RESERVED_AUDIO_BITRATE_BPS);
            }
            other => panic!("expected TargetTooSmall, got {:?}", other),
        }
    }

    #[test]
    fn test_allocate_rejects_sub_kilobit_video() {
        // 1 MiB over 64s is 131_072 bps, leaving 3_072 bps for video
        let target = TargetSize::from_megabytes(1.0).unwrap();
        assert_eq!(BitrateBudget::allocate(target, 64.0).unwrap().video_kbps(), 3);

        // 65s leaves roughly 1_055 bps
        assert_eq!(BitrateBudget::allocate(target, 65.0).unwrap().video_kbps(), 1);

        // 1 MiB over 65.5s leaves roughly 70 bps, which truncates to 0 kbps
        let err = BitrateBudget::allocate(target, 65.5).unwrap_err();
        assert!(matches!(err, ShrinkError::TargetTooSmall { .. }));
    }

    #[test]
    fn test_allocate_rejects_bad_duration() {
        let target = TargetSize::from_megabytes(10.0).unwrap();
        for duration in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = BitrateBudget::allocate(target, duration).unwrap_err();
            assert!(matches!(err, ShrinkError::ProbeFailed { .. }));
        }
    }

    #[test]
    fn test_target_size_parse() {
        assert_eq!("25".parse::<TargetSize>().unwrap().megabytes(), 25.0);
        assert_eq!(" 7.5 ".parse::<TargetSize>().unwrap().megabytes(), 7.5);

        let err = "ten".parse::<TargetSize>().unwrap_err();
        assert_eq!(err.to_string(), "Target size must be a valid number.");

        for bad in ["0", "-4", "NaN", "inf"] {
            let err = bad.parse::<TargetSize>().unwrap_err();
            assert_eq!(err.to_string(), "Target size must be a positive number.");
        }
    }

    #[test]
    fn test_target_size_deserialize_validates() {
        let size: TargetSize = serde_json::from_str("12.5").unwrap();
        assert_eq!(size.megabytes(), 12.5);
        assert!(serde_json::from_str::<TargetSize>("-1").is_err());
    }

    #[test]
    fn test_target_size_display() {
        assert_eq!(TargetSize::from_megabytes(100.0).unwrap().to_string(), "100 MB");
    }
}
