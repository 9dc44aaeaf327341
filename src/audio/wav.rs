//! PCM container codec
//!
//! Encodes sample buffers into in-memory WAV bytes (RIFF/WAVE, PCM format
//! tag 1, 16-bit little-endian) and decodes the two payload shapes the
//! pipeline receives: raw header-less speech PCM from the narration
//! service, and WAV containers for backing tracks. Container parsing is
//! delegated to the hound crate.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::audio::buffer::{check_frame_budget, SampleBuffer};
use crate::error::{CadenzaError, Result};

/// Bit depth for all encoded output
pub const PCM_BIT_DEPTH: u16 = 16;

/// Encode a buffer as 16-bit PCM WAV bytes
///
/// Each sample is clamped to -1.0..1.0 and scaled asymmetrically (positive
/// values by 32767, negative by 32768) with truncation toward zero, then
/// written as interleaved little-endian frames behind the standard 44-byte
/// header. An empty buffer yields a header with an empty data section.
pub fn encode_wav(buffer: &SampleBuffer) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: buffer.num_channels() as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: PCM_BIT_DEPTH,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| CadenzaError::ContainerEncode { source: e })?;

        for frame in 0..buffer.num_frames() {
            for channel in buffer.channels() {
                writer
                    .write_sample(quantize_i16(channel[frame]))
                    .map_err(|e| CadenzaError::ContainerEncode { source: e })?;
            }
        }

        writer
            .finalize()
            .map_err(|e| CadenzaError::ContainerEncode { source: e })?;
    }

    Ok(cursor.into_inner())
}

/// Decode a raw header-less mono 16-bit PCM payload
///
/// This is the shape the speech service returns after base64 decoding:
/// interleaved (trivially, since mono) signed 16-bit little-endian samples
/// at a caller-supplied fixed rate. Floats are normalized by 1/32768.
pub fn decode_raw_pcm(bytes: &[u8], sample_rate: u32) -> Result<SampleBuffer> {
    if sample_rate == 0 {
        return Err(CadenzaError::InvalidParameter {
            param: "sample_rate",
            value: 0.0,
            min: 1.0,
            max: f32::INFINITY,
        });
    }
    if bytes.len() % 2 != 0 {
        return Err(CadenzaError::MalformedPcm {
            details: format!("byte length {} is odd", bytes.len()),
        });
    }
    check_frame_budget(bytes.len() / 2, sample_rate)?;

    let samples: Vec<f32> = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect();

    Ok(SampleBuffer::from_mono(samples, sample_rate))
}

/// Decode a WAV container into a planar buffer
///
/// Accepts the integer and float formats hound understands, normalizing
/// everything to f32. Mono and stereo only, matching what the mixer can
/// place in its two output channels.
pub fn decode_wav(bytes: &[u8]) -> Result<SampleBuffer> {
    let reader = WavReader::new(Cursor::new(bytes))
        .map_err(|e| CadenzaError::ContainerDecode { source: e })?;

    let spec = reader.spec();
    let num_channels = spec.channels as usize;
    let sample_rate = spec.sample_rate;

    if num_channels == 0 || num_channels > 2 {
        return Err(CadenzaError::UnsupportedFormat {
            details: format!(
                "{}-channel audio (only mono/stereo supported)",
                num_channels
            ),
        });
    }
    if sample_rate == 0 {
        return Err(CadenzaError::UnsupportedFormat {
            details: "container declares a zero sample rate".to_string(),
        });
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map_err(|e| CadenzaError::ContainerDecode { source: e }))
            .collect::<Result<Vec<f32>>>()?,
        SampleFormat::Int => {
            let max_val = (1u32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| {
                    s.map(|v| v as f32 / max_val)
                        .map_err(|e| CadenzaError::ContainerDecode { source: e })
                })
                .collect::<Result<Vec<f32>>>()?
        }
    };

    check_frame_budget(interleaved.len() / num_channels, sample_rate)?;

    let channels: Vec<Vec<f32>> = (0..num_channels)
        .map(|ch| {
            interleaved
                .iter()
                .skip(ch)
                .step_by(num_channels)
                .copied()
                .collect()
        })
        .collect();

    SampleBuffer::from_channels(channels, sample_rate)
}

/// Clamp and scale one float sample to i16 per the container contract
fn quantize_i16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped >= 0.0 {
        (clamped * 32767.0) as i16
    } else {
        (clamped * 32768.0) as i16
    }
}
