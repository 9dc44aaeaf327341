//! Render engine
//!
//! Orchestrates the full pipeline: decode inputs, resample to the output
//! rate, time-stretch the narration, mix in the looping backing bed, and
//! encode the result as WAV bytes.

mod renderer;

pub use renderer::{render, RenderRequest, DEFAULT_OUTPUT_SAMPLE_RATE, SPEECH_SAMPLE_RATE};
