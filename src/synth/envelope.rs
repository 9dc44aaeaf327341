//! Amplitude envelope
//!
//! Every note is shaped by the same trapezoid: a linear attack up to a low
//! ambient level, a sustain, and a linear release back to zero. The
//! envelope closes at both edges of the note.

/// Attack length in seconds
pub const ATTACK_SECS: f32 = 0.5;

/// Release length in seconds
pub const RELEASE_SECS: f32 = 1.0;

/// Sustain level for the backing bed
pub const AMBIENT_LEVEL: f32 = 0.2;

/// Trapezoidal amplitude envelope for one note
///
/// For notes shorter than attack + release (1.5 s), both segments shrink
/// by the common factor `duration / 1.5`, keeping the 1:2 attack:release
/// ratio and the envelope continuous and non-negative; the sustain
/// segment collapses to zero width.
#[derive(Debug, Clone, Copy)]
pub struct TrapezoidEnvelope {
    attack: f32,
    release: f32,
    duration: f32,
}

impl TrapezoidEnvelope {
    /// Build the envelope for a note of the given duration in seconds
    pub fn for_duration(duration: f32) -> Self {
        let nominal = ATTACK_SECS + RELEASE_SECS;
        if duration < nominal {
            let scale = (duration / nominal).max(0.0);
            Self {
                attack: ATTACK_SECS * scale,
                release: RELEASE_SECS * scale,
                duration,
            }
        } else {
            Self {
                attack: ATTACK_SECS,
                release: RELEASE_SECS,
                duration,
            }
        }
    }

    /// Amplitude at `t` seconds into the note
    ///
    /// Zero outside the note, including at exactly t = 0 handled by the
    /// attack ramp starting from zero.
    pub fn amplitude(&self, t: f32) -> f32 {
        if t < 0.0 || t >= self.duration || self.duration <= 0.0 {
            return 0.0;
        }
        if t < self.attack {
            return AMBIENT_LEVEL * t / self.attack;
        }
        let release_start = self.duration - self.release;
        if t > release_start {
            return AMBIENT_LEVEL * (self.duration - t) / self.release;
        }
        AMBIENT_LEVEL
    }
}
