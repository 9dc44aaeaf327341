//! Sample rate conversion
//!
//! Linear-interpolation resampling, applied when a decoded input's rate
//! differs from the render output rate. Linear interpolation introduces
//! some aliasing on downsampling; acceptable for this offline pipeline.

use crate::audio::buffer::{check_frame_budget, SampleBuffer};
use crate::error::Result;

/// Resample a buffer to a target rate
///
/// Output frame count is `round(in_frames * target_rate / source_rate)`.
/// A buffer already at the target rate is returned unchanged.
pub fn resample_buffer(buffer: &SampleBuffer, target_rate: u32) -> Result<SampleBuffer> {
    if buffer.sample_rate() == target_rate {
        return Ok(buffer.clone());
    }

    let ratio = target_rate as f64 / buffer.sample_rate() as f64;
    let target_len = (buffer.num_frames() as f64 * ratio).round() as usize;
    check_frame_budget(target_len, target_rate)?;

    let channels: Vec<Vec<f32>> = buffer
        .channels()
        .iter()
        .map(|channel| resample_linear(channel, ratio, target_len))
        .collect();

    SampleBuffer::from_channels(channels, target_rate)
}

/// Linear interpolation resampling of one channel
fn resample_linear(samples: &[f32], ratio: f64, target_len: usize) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let source_len = samples.len();
    let mut output = Vec::with_capacity(target_len);

    for i in 0..target_len {
        let src_pos = i as f64 / ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        let sample = if src_idx + 1 < source_len {
            samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac
        } else if src_idx < source_len {
            samples[src_idx]
        } else {
            0.0
        };

        output.push(sample);
    }

    output
}
