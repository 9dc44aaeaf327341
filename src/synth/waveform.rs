//! Waveform generators
//!
//! Naive (non-band-limited) shapes evaluated by phase. Aliasing on the
//! discontinuous shapes is acceptable at the ambient levels the envelope
//! produces.

use serde::{Deserialize, Serialize};

/// Supported waveform shapes
///
/// Serialized as the lowercase tags the score-generation service emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl Waveform {
    /// Evaluate the waveform at a phase measured in cycles
    ///
    /// `phase` is `frequency * t`; only its fractional part matters.
    /// All shapes span -1.0..1.0 at unit amplitude.
    pub fn sample(self, phase: f32) -> f32 {
        let t = phase - phase.floor();
        match self {
            Waveform::Sine => (2.0 * std::f32::consts::PI * t).sin(),
            // Piecewise linear: -1 -> +1 over the first half period,
            // +1 -> -1 over the second
            Waveform::Triangle => {
                if t < 0.5 {
                    4.0 * t - 1.0
                } else {
                    3.0 - 4.0 * t
                }
            }
            Waveform::Square => {
                if t < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            // Linear ramp -1 -> +1 once per period
            Waveform::Sawtooth => 2.0 * t - 1.0,
        }
    }
}
