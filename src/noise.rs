//! Background noise generator for masking a loud environment.
//!
//! Generates a short noise loop and plays it on repeat through rodio until
//! toggled off.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, info, warn};

use crate::config::NoiseConfig;
use crate::error::AudioError;

const MAX_LOOP_SECS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseColor {
    White,
    Brown,
}

impl NoiseColor {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "white" => Some(Self::White),
            "brown" => Some(Self::Brown),
            _ => None,
        }
    }
}

/// Produce `len` mono samples bounded by `volume`.
pub fn generate_noise<R: Rng>(color: NoiseColor, volume: f32, len: usize, rng: &mut R) -> Vec<f32> {
    let volume = volume.clamp(0.0, 1.0);
    let mut samples = Vec::with_capacity(len);

    match color {
        NoiseColor::White => {
            for _ in 0..len {
                samples.push(rng.gen_range(-1.0f32..1.0) * volume);
            }
        }
        NoiseColor::Brown => {
            // Leaky integrator over white noise; |last| never exceeds 1.
            let mut last = 0.0f32;
            for _ in 0..len {
                let white = rng.gen_range(-1.0f32..1.0);
                last = (last + 0.02 * white) / 1.02;
                samples.push((last * 3.5).clamp(-1.0, 1.0) * volume);
            }
        }
    }

    samples
}

struct Playback {
    sink: Sink,
    // Dropping the stream stops all audio, so it lives as long as the sink.
    _stream: OutputStream,
}

pub struct NoisePlayer {
    config: NoiseConfig,
    color: NoiseColor,
    playback: Option<Playback>,
}

impl NoisePlayer {
    pub fn new(config: NoiseConfig) -> Self {
        let color = NoiseColor::from_name(&config.color).unwrap_or_else(|| {
            warn!("Unknown noise color '{}', using brown", config.color);
            NoiseColor::Brown
        });
        Self {
            config,
            color,
            playback: None,
        }
    }

    pub fn color(&self) -> NoiseColor {
        self.color
    }

    pub fn set_color(&mut self, color: NoiseColor) {
        self.color = color;
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    /// Start or stop playback. Returns whether noise is now playing.
    pub fn toggle(&mut self) -> Result<bool, AudioError> {
        if self.is_playing() {
            self.stop();
        } else {
            self.start()?;
        }
        Ok(self.is_playing())
    }

    pub fn start(&mut self) -> Result<(), AudioError> {
        if self.is_playing() {
            return Ok(());
        }

        let stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::Output(e.to_string()))?;

        let sample_rate = self.sample_rate();
        let len = self.loop_len();
        let mut rng = StdRng::from_entropy();
        let samples = generate_noise(self.color, self.config.volume, len, &mut rng);
        debug!("Generated {len} samples of {:?} noise", self.color);

        // rodio 0.21: Sink::connect_new takes &Mixer
        let sink = Sink::connect_new(stream.mixer());
        sink.append(SamplesBuffer::new(1, sample_rate, samples).repeat_infinite());

        self.playback = Some(Playback {
            sink,
            _stream: stream,
        });
        info!("Noise generator on ({:?})", self.color);
        Ok(())
    }

    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.clamp(8000, 192_000)
    }

    /// Samples in one noise loop; the loop is replayed, so it never needs
    /// to be longer than `MAX_LOOP_SECS`.
    fn loop_len(&self) -> usize {
        let secs = self.config.loop_secs.clamp(1, MAX_LOOP_SECS) as usize;
        (self.sample_rate() as usize)
            .checked_mul(secs)
            .unwrap_or(usize::MAX)
    }

    pub fn stop(&mut self) {
        if let Some(playback) = self.playback.take() {
            playback.sink.stop();
            info!("Noise generator off");
        }
    }
}

impl Drop for NoisePlayer {
    fn drop(&mut self) {
        self.stop();
    }
}
