//! Audio verification utilities
//!
//! Objective measurements for audio quality testing without manual
//! listening. The time-stretch engine is lossy by design, so its tests
//! bound energy, amplitude, and pitch properties with these helpers
//! instead of comparing waveforms sample-by-sample.

use rustfft::{num_complex::Complex, FftPlanner};

/// Threshold for considering a sample as clipped (at digital maximum)
const CLIP_THRESHOLD: f32 = 0.9999;

/// Convert linear amplitude to decibels
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Convert decibels to linear amplitude
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Calculate RMS (Root Mean Square) of samples
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    ((sum_squares / samples.len() as f64).sqrt()) as f32
}

/// Calculate RMS in decibels
pub fn calculate_rms_db(samples: &[f32]) -> f32 {
    linear_to_db(calculate_rms(samples))
}

/// Calculate peak (maximum absolute value) of samples
pub fn calculate_peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// Count samples that are clipped (at or near digital maximum)
pub fn count_clipped_samples(samples: &[f32]) -> usize {
    samples.iter().filter(|s| s.abs() >= CLIP_THRESHOLD).count()
}

/// Estimate the dominant frequency of a signal in Hz
///
/// Runs a forward FFT over up to the first 65536 samples and returns the
/// frequency of the strongest non-DC bin. Resolution is limited by the
/// analyzed length; callers should allow a tolerance of at least one bin
/// width (`sample_rate / analyzed_len`).
pub fn dominant_frequency(samples: &[f32], sample_rate: u32) -> f32 {
    let len = samples.len().min(65536);
    if len < 16 {
        return 0.0;
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(len);
    let mut spectrum: Vec<Complex<f32>> = samples[..len]
        .iter()
        .map(|&s| Complex::new(s, 0.0))
        .collect();
    fft.process(&mut spectrum);

    let mut best_bin = 0;
    let mut best_mag = 0.0f32;
    for (bin, value) in spectrum.iter().enumerate().take(len / 2).skip(1) {
        let mag = value.norm();
        if mag > best_mag {
            best_mag = mag;
            best_bin = bin;
        }
    }

    best_bin as f32 * sample_rate as f32 / len as f32
}
