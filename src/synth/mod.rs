//! Additive oscillator synthesizer
//!
//! Renders a generated note score into a mono sample buffer: four basic
//! waveform generators shaped by a fixed trapezoidal envelope, summed
//! additively so overlapping notes stack.

mod envelope;
mod score;
mod synthesizer;
mod waveform;

pub use envelope::{TrapezoidEnvelope, AMBIENT_LEVEL, ATTACK_SECS, RELEASE_SECS};
pub use score::{Note, Score};
pub use synthesizer::{render_score, MIN_RENDER_SECS};
pub use waveform::Waveform;
