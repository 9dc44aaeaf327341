//! Score rendering
//!
//! Turns a validated score into a mono sample buffer. Each note is
//! generated independently and summed into the output, so overlapping
//! notes stack and can transiently exceed the envelope ceiling; the codec
//! clamps at encode time.

use tracing::debug;

use crate::audio::{check_frame_budget, SampleBuffer};
use crate::error::Result;
use crate::synth::envelope::TrapezoidEnvelope;
use crate::synth::score::Score;

/// Minimum output length in seconds
///
/// Scores shorter than this still render a buffer of this length so the
/// backing bed never runs out before the narration does.
pub const MIN_RENDER_SECS: f32 = 10.0;

/// Render a score into a mono buffer at the given sample rate
///
/// Output length is `floor(max(total_duration, 10.0) * sample_rate)`
/// frames. An empty note list renders pure silence of the floor duration.
/// Notes reaching past the end of the buffer are truncated at the buffer
/// end.
pub fn render_score(score: &Score, sample_rate: u32) -> Result<SampleBuffer> {
    score.validate()?;

    let total_secs = score.total_duration.max(MIN_RENDER_SECS);
    let num_frames = (total_secs as f64 * sample_rate as f64) as usize;
    check_frame_budget(num_frames, sample_rate)?;

    debug!(
        notes = score.notes.len(),
        seconds = total_secs,
        sample_rate,
        "rendering score"
    );

    let mut samples = vec![0.0f32; num_frames];
    let rate = sample_rate as f64;

    for note in &score.notes {
        let envelope = TrapezoidEnvelope::for_duration(note.duration);
        let start_frame = (note.start_time as f64 * rate) as usize;
        let note_frames = (note.duration as f64 * rate) as usize;

        for i in 0..note_frames {
            let index = start_frame + i;
            if index >= num_frames {
                break;
            }
            let t = i as f32 / sample_rate as f32;
            let phase = note.freq * t;
            samples[index] += note.waveform.sample(phase) * envelope.amplitude(t);
        }
    }

    Ok(SampleBuffer::from_mono(samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::verification::{calculate_peak, dominant_frequency};
    use crate::synth::score::Note;
    use crate::synth::waveform::Waveform;

    fn single_note_score(freq: f32, duration: f32, start_time: f32) -> Score {
        Score {
            notes: vec![Note {
                freq,
                duration,
                start_time,
                waveform: Waveform::Sine,
            }],
            total_duration: start_time + duration,
            tempo: 120.0,
        }
    }

    #[test]
    fn test_empty_score_renders_floor_of_silence() {
        let score = Score {
            notes: vec![],
            total_duration: 0.0,
            tempo: 120.0,
        };
        let buffer = render_score(&score, 44100).unwrap();
        assert_eq!(buffer.num_channels(), 1);
        assert_eq!(
            buffer.num_frames(),
            (MIN_RENDER_SECS * 44100.0) as usize
        );
        assert!(buffer.channel(0).iter().all(|&s| s.abs() <= 1e-6));
    }

    #[test]
    fn test_long_score_uses_total_duration() {
        let score = Score {
            notes: vec![],
            total_duration: 12.5,
            tempo: 120.0,
        };
        let buffer = render_score(&score, 8000).unwrap();
        assert_eq!(buffer.num_frames(), 100_000);
    }

    #[test]
    fn test_note_amplitude_closes_at_edges() {
        let score = single_note_score(440.0, 4.0, 2.0);
        let buffer = render_score(&score, 44100).unwrap();
        let samples = buffer.channel(0);

        let start = (2.0 * 44100.0) as usize;
        let end = (6.0 * 44100.0) as usize;

        // At the exact start and end frames the envelope is closed
        assert!(samples[start].abs() < 1e-3);
        assert!(samples[end.min(samples.len() - 1)].abs() < 1e-3);
        // Before the note there is only silence
        assert!(samples[..start].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_note_reaches_ambient_level() {
        let score = single_note_score(440.0, 4.0, 0.0);
        let buffer = render_score(&score, 44100).unwrap();
        // Sustain region peaks near the ambient level
        let sustain = &buffer.channel(0)[44100..88200];
        let peak = calculate_peak(sustain);
        assert!((peak - 0.2).abs() < 0.01, "sustain peak {}", peak);
    }

    #[test]
    fn test_rendered_pitch() {
        let score = single_note_score(523.25, 6.0, 0.0);
        let buffer = render_score(&score, 44100).unwrap();
        // Analyze the sustain region away from the ramps
        let sustain = &buffer.channel(0)[44100..5 * 44100];
        let freq = dominant_frequency(sustain, 44100);
        assert!((freq - 523.25).abs() < 2.0, "got {}", freq);
    }

    #[test]
    fn test_overlapping_notes_sum() {
        let score = Score {
            notes: vec![
                Note {
                    freq: 440.0,
                    duration: 4.0,
                    start_time: 0.0,
                    waveform: Waveform::Sine,
                },
                Note {
                    freq: 440.0,
                    duration: 4.0,
                    start_time: 0.0,
                    waveform: Waveform::Sine,
                },
            ],
            total_duration: 4.0,
            tempo: 120.0,
        };
        let double = render_score(&score, 44100).unwrap();
        let single = render_score(&single_note_score(440.0, 4.0, 0.0), 44100).unwrap();

        for (d, s) in double
            .channel(0)
            .iter()
            .zip(single.channel(0).iter())
            .skip(44100)
            .take(44100)
        {
            assert!((d - 2.0 * s).abs() < 1e-5);
        }
    }

    #[test]
    fn test_note_truncated_at_buffer_end() {
        // Note extends past total_duration; buffer length wins
        let score = Score {
            notes: vec![Note {
                freq: 440.0,
                duration: 30.0,
                start_time: 5.0,
                waveform: Waveform::Square,
            }],
            total_duration: 12.0,
            tempo: 120.0,
        };
        let buffer = render_score(&score, 8000).unwrap();
        assert_eq!(buffer.num_frames(), 96_000);
    }

    #[test]
    fn test_invalid_note_rejected_before_alloc() {
        let score = single_note_score(-440.0, 4.0, 0.0);
        assert!(render_score(&score, 44100).is_err());
    }

    #[test]
    fn test_excessive_duration_rejected() {
        let score = Score {
            notes: vec![],
            total_duration: 8000.0,
            tempo: 120.0,
        };
        assert!(render_score(&score, 44100).is_err());
    }
}
