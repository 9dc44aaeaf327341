//! Cadenza CLI - Offline Narration Renderer
//!
//! Thin file-in/file-out wrapper over the cadenza library. The library
//! itself reads no CLI arguments, environment variables, or persisted
//! state; everything external lives here.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cadenza::audio::{decode_wav, encode_wav};
use cadenza::engine::{render, RenderRequest, DEFAULT_OUTPUT_SAMPLE_RATE, SPEECH_SAMPLE_RATE};
use cadenza::stretch::stretch;
use cadenza::synth::{render_score, Score};

#[derive(Parser)]
#[command(name = "cadenza-cli", version, about = "Offline narration renderer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mix a raw narration PCM file with an optional backing bed
    Render {
        /// Raw mono 16-bit LE PCM file from the speech service
        speech: PathBuf,
        /// WAV file to loop under the narration
        #[arg(long, conflicts_with = "score")]
        backing: Option<PathBuf>,
        /// Score JSON to synthesize into a backing bed
        #[arg(long)]
        score: Option<PathBuf>,
        /// Playback speed ratio (recommended 0.5..3.0)
        #[arg(long, default_value_t = 1.0)]
        speed: f32,
        /// Backing bed gain, 0.0..1.0
        #[arg(long, default_value_t = 0.3)]
        gain: f32,
        /// Sample rate of the raw narration payload
        #[arg(long, default_value_t = SPEECH_SAMPLE_RATE)]
        speech_rate: u32,
        /// Output sample rate
        #[arg(long, default_value_t = DEFAULT_OUTPUT_SAMPLE_RATE)]
        sample_rate: u32,
        /// Output WAV path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Synthesize a score JSON file to a WAV file
    Synth {
        /// Score JSON file
        score: PathBuf,
        /// Output sample rate
        #[arg(long, default_value_t = DEFAULT_OUTPUT_SAMPLE_RATE)]
        sample_rate: u32,
        /// Output WAV path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Time-stretch a WAV file, preserving pitch
    Stretch {
        /// Input WAV file
        input: PathBuf,
        /// Playback speed ratio (recommended 0.5..3.0)
        #[arg(long)]
        speed: f32,
        /// Output WAV path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    info!("Cadenza v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Render {
            speech,
            backing,
            score,
            speed,
            gain,
            speech_rate,
            sample_rate,
            output,
        } => {
            let speech_pcm = fs::read(&speech)
                .with_context(|| format!("reading narration {}", speech.display()))?;

            let backing_wav = match (backing, score) {
                (Some(path), _) => Some(
                    fs::read(&path)
                        .with_context(|| format!("reading backing {}", path.display()))?,
                ),
                (None, Some(path)) => {
                    let json = fs::read_to_string(&path)
                        .with_context(|| format!("reading score {}", path.display()))?;
                    let score = Score::from_json(&json)?;
                    let bed = render_score(&score, sample_rate)?;
                    Some(encode_wav(&bed)?)
                }
                (None, None) => None,
            };

            let mut request = RenderRequest::new(speech_pcm, speech_rate)
                .with_speed(speed)
                .with_output_sample_rate(sample_rate);
            if let Some(wav) = backing_wav {
                request = request.with_backing(wav, gain);
            }

            let bytes = render(&request)?;
            fs::write(&output, bytes)
                .with_context(|| format!("writing {}", output.display()))?;
            info!("wrote {}", output.display());
        }
        Commands::Synth {
            score,
            sample_rate,
            output,
        } => {
            let json = fs::read_to_string(&score)
                .with_context(|| format!("reading score {}", score.display()))?;
            let score = Score::from_json(&json)?;
            let buffer = render_score(&score, sample_rate)?;
            fs::write(&output, encode_wav(&buffer)?)
                .with_context(|| format!("writing {}", output.display()))?;
            info!("wrote {}", output.display());
        }
        Commands::Stretch {
            input,
            speed,
            output,
        } => {
            let bytes =
                fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            let buffer = decode_wav(&bytes)?;
            let stretched = stretch(&buffer, speed)?;
            fs::write(&output, encode_wav(&stretched)?)
                .with_context(|| format!("writing {}", output.display()))?;
            info!("wrote {}", output.display());
        }
    }

    Ok(())
}
