//! The two user-facing operations: size-targeted compression and audio
//! extraction.
//!
//! Each call is a single synchronous pass over one file: validate the input,
//! (probe and budget, for compression), run the encoder once, confirm the
//! output exists. Failed calls leave any partial output where the encoder put
//! it.

mod compress;
mod extract;
mod types;

pub use compress::Compressor;
pub use extract::{
    resolve_audio_output, Extractor, DEFAULT_AUDIO_BITRATE_KBPS, EXTRACT_AUDIO_CODEC,
};
pub use types::OperationReport;
