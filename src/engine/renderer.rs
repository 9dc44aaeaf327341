//! Mix rendering
//!
//! One render call owns all of its buffers: decode resources live inside
//! this function's scope and are released on every exit path, success or
//! failure. The narration is the only stretched signal; the backing bed
//! is an independently looping ambient layer and is never time- or
//! pitch-shifted.

use tracing::{debug, info_span};

use crate::audio::{decode_raw_pcm, decode_wav, encode_wav, resample_buffer, SampleBuffer};
use crate::error::{CadenzaError, Result};
use crate::stretch::stretch;

/// Sample rate of raw narration payloads from the speech service
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;

/// Default output rate for encoded renders
pub const DEFAULT_OUTPUT_SAMPLE_RATE: u32 = 44_100;

/// Parameters for one render pass
///
/// Transient: built, validated, consumed by [`render`], discarded.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Raw header-less mono 16-bit LE narration PCM
    pub speech_pcm: Vec<u8>,
    /// Sample rate of the raw narration payload
    pub speech_sample_rate: u32,
    /// Optional WAV container for the backing bed
    pub backing_wav: Option<Vec<u8>>,
    /// Playback speed ratio; > 1.0 shortens the narration
    pub speed: f32,
    /// Linear gain applied to the backing bed, 0.0..1.0
    pub backing_gain: f32,
    /// Sample rate of the encoded output
    pub output_sample_rate: u32,
}

impl RenderRequest {
    /// Build a request with default speed, gain, and output rate
    pub fn new(speech_pcm: Vec<u8>, speech_sample_rate: u32) -> Self {
        Self {
            speech_pcm,
            speech_sample_rate,
            backing_wav: None,
            speed: 1.0,
            backing_gain: 0.0,
            output_sample_rate: DEFAULT_OUTPUT_SAMPLE_RATE,
        }
    }

    /// Set the playback speed ratio
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Attach a backing bed at the given gain
    pub fn with_backing(mut self, wav_bytes: Vec<u8>, gain: f32) -> Self {
        self.backing_wav = Some(wav_bytes);
        self.backing_gain = gain;
        self
    }

    /// Set the output sample rate
    pub fn with_output_sample_rate(mut self, sample_rate: u32) -> Self {
        self.output_sample_rate = sample_rate;
        self
    }

    /// Reject out-of-range parameters before any buffer is allocated
    fn validate(&self) -> Result<()> {
        if !(self.speed > 0.0) || !self.speed.is_finite() {
            return Err(CadenzaError::InvalidParameter {
                param: "speed",
                value: self.speed,
                min: 0.0,
                max: f32::INFINITY,
            });
        }
        if !(0.0..=1.0).contains(&self.backing_gain) || !self.backing_gain.is_finite() {
            return Err(CadenzaError::InvalidParameter {
                param: "backing_gain",
                value: self.backing_gain,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.speech_sample_rate == 0 {
            return Err(CadenzaError::InvalidParameter {
                param: "speech_sample_rate",
                value: 0.0,
                min: 1.0,
                max: f32::INFINITY,
            });
        }
        if self.output_sample_rate == 0 {
            return Err(CadenzaError::InvalidParameter {
                param: "output_sample_rate",
                value: 0.0,
                min: 1.0,
                max: f32::INFINITY,
            });
        }
        Ok(())
    }
}

/// Render a request to encoded WAV bytes
///
/// Pipeline: decode narration -> resample to the output rate -> stretch
/// at the requested speed -> duplicate to two channels at unity gain ->
/// add the looping backing bed scaled by its gain -> encode 16-bit PCM.
pub fn render(request: &RenderRequest) -> Result<Vec<u8>> {
    let span = info_span!("render", speed = request.speed, gain = request.backing_gain);
    let _guard = span.enter();

    request.validate()?;

    let speech = decode_raw_pcm(&request.speech_pcm, request.speech_sample_rate)?;
    let speech = resample_buffer(&speech, request.output_sample_rate)?;
    let stretched = stretch(&speech, request.speed)?;

    let num_frames = stretched.num_frames();
    let mut mix = SampleBuffer::silence(2, num_frames, request.output_sample_rate);

    // Narration into both channels at unity gain
    for ch in 0..2 {
        mix.channel_mut(ch).copy_from_slice(stretched.channel(0));
    }

    if let Some(wav_bytes) = &request.backing_wav {
        let backing = decode_wav(wav_bytes)?;
        let backing = resample_buffer(&backing, request.output_sample_rate)?;
        add_looped(&mut mix, &backing, request.backing_gain);
    }

    debug!(frames = num_frames, "encoding mix");
    encode_wav(&mix)
}

/// Tile the backing bed cyclically across the mix and add it at a gain
///
/// A mono bed feeds both output channels; a stereo bed maps L->L, R->R.
/// A zero-length bed contributes nothing.
fn add_looped(mix: &mut SampleBuffer, backing: &SampleBuffer, gain: f32) {
    let backing_frames = backing.num_frames();
    if backing_frames == 0 || gain == 0.0 {
        return;
    }

    for ch in 0..mix.num_channels() {
        let source = backing.channel(ch.min(backing.num_channels() - 1));
        for (i, sample) in mix.channel_mut(ch).iter_mut().enumerate() {
            *sample += source[i % backing_frames] * gain;
        }
    }
}
