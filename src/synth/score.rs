//! Score and note types
//!
//! A score is the structured output of the music-generation service:
//! a list of timed notes plus a total duration and an informational tempo.
//! Field names follow the service's JSON contract (camelCase, `type` for
//! the waveform tag).

use serde::{Deserialize, Serialize};

use crate::error::{CadenzaError, Result};
use crate::synth::waveform::Waveform;

/// A single synthesis event
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Frequency in Hz, must be positive
    pub freq: f32,
    /// Length in seconds, must be positive
    pub duration: f32,
    /// Offset from the start of the score in seconds, must be non-negative
    pub start_time: f32,
    /// Waveform shape
    #[serde(rename = "type")]
    pub waveform: Waveform,
}

/// An ordered sequence of notes with score-level metadata
///
/// Note order is irrelevant to rendering; notes may overlap and their
/// contributions sum. `tempo` is informational only and is not consumed
/// by synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub notes: Vec<Note>,
    /// Total duration in seconds
    pub total_duration: f32,
    /// Beats per minute, informational
    pub tempo: f32,
}

impl Score {
    /// Parse a score from the service's JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate every note before any buffer is allocated
    ///
    /// Rejecting rather than clamping keeps upstream generation bugs
    /// visible.
    pub fn validate(&self) -> Result<()> {
        for (index, note) in self.notes.iter().enumerate() {
            if !(note.freq > 0.0) || !note.freq.is_finite() {
                return Err(CadenzaError::InvalidNote {
                    index,
                    reason: format!("frequency {} must be positive", note.freq),
                });
            }
            if !(note.duration > 0.0) || !note.duration.is_finite() {
                return Err(CadenzaError::InvalidNote {
                    index,
                    reason: format!("duration {} must be positive", note.duration),
                });
            }
            if !(note.start_time >= 0.0) || !note.start_time.is_finite() {
                return Err(CadenzaError::InvalidNote {
                    index,
                    reason: format!("start time {} must be non-negative", note.start_time),
                });
            }
        }
        if !self.total_duration.is_finite() {
            return Err(CadenzaError::InvalidParameter {
                param: "total_duration",
                value: self.total_duration,
                min: 0.0,
                max: f32::INFINITY,
            });
        }
        Ok(())
    }
}
