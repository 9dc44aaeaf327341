//! Error types for Cadenza
//!
//! All errors in Cadenza use the CadenzaError type, providing
//! consistent error handling with recovery paths. Every failure is local
//! and synchronous: operations either complete or return an error to the
//! immediate caller, and nothing here is retried internally.

use thiserror::Error;

/// Result type alias using CadenzaError
pub type Result<T> = std::result::Result<T, CadenzaError>;

/// All possible errors in Cadenza
#[derive(Error, Debug)]
pub enum CadenzaError {
    // Input decoding errors
    #[error("Malformed raw PCM payload: {details}")]
    MalformedPcm { details: String },

    #[error("Failed to decode audio container")]
    ContainerDecode {
        #[source]
        source: hound::Error,
    },

    #[error("Failed to encode audio container")]
    ContainerEncode {
        #[source]
        source: hound::Error,
    },

    #[error("Unsupported audio format: {details}")]
    UnsupportedFormat { details: String },

    // Buffer construction errors
    #[error("Sample buffer has no channels")]
    EmptyBuffer,

    #[error("Inconsistent channel lengths: {details}")]
    ChannelMismatch { details: String },

    // Parameter validation errors
    #[error("Invalid parameter: {param} = {value} (valid range: {min}..{max})")]
    InvalidParameter {
        param: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("Invalid note at index {index}: {reason}")]
    InvalidNote { index: usize, reason: String },

    // Resource limits
    #[error("Render too large: {requested_frames} frames exceeds limit of {max_frames}")]
    RenderTooLarge {
        requested_frames: usize,
        max_frames: usize,
    },

    // Generic I/O
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Score parse error: {0}")]
    ScoreParse(#[from] serde_json::Error),
}

impl CadenzaError {
    /// Returns a suggested recovery action for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::MalformedPcm { .. } => {
                "Check that the payload is complete 16-bit little-endian PCM"
            }
            Self::ContainerDecode { .. } => "Check that the bytes are a valid WAV file",
            Self::ContainerEncode { .. } => "Check available memory and buffer dimensions",
            Self::UnsupportedFormat { .. } => "Convert the backing track to mono or stereo WAV",
            Self::EmptyBuffer => "Provide at least one channel of audio",
            Self::ChannelMismatch { .. } => "Ensure all channels carry the same frame count",
            Self::InvalidParameter { .. } => "Adjust the parameter to be within valid range",
            Self::InvalidNote { .. } => "Regenerate the score; a note has out-of-range fields",
            Self::RenderTooLarge { .. } => "Shorten the score or input audio (2 hour limit)",
            _ => "Check the error details and try again",
        }
    }
}
