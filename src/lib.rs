//! Cadenza - Offline Audio Rendering Pipeline
//!
//! Cadenza turns AI-generated raw speech PCM and a generated note score into
//! a mixed, time-stretched, pitch-preserved WAV file. Every stage is a pure,
//! blocking transformation over complete in-memory buffers:
//!
//! 1. Codec: raw speech PCM and WAV containers decode to [`SampleBuffer`]s,
//!    and the final buffer encodes back to WAV bytes
//! 2. Synthesizer: a [`synth::Score`] renders additively to a mono buffer
//! 3. Time-Stretch Engine: overlap-add resynthesis changes duration without
//!    changing pitch
//! 4. Mixer/Renderer: the stretched narration is duplicated to stereo and an
//!    optional looping backing bed is added at a gain
//!
//! There is no streaming mode, no audio-callback deadline, and no shared
//! mutable state: each render call owns its buffers exclusively.

pub mod audio;
pub mod engine;
pub mod error;
pub mod stretch;
pub mod synth;

// Re-export commonly used types
pub use audio::SampleBuffer;
pub use engine::{render, RenderRequest};
pub use error::{CadenzaError, Result};
