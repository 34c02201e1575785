//! Background music.
//!
//! Playback is best effort: a missing track, a missing output device or a
//! build without the `audio` feature is logged and otherwise ignored. The
//! decoded track loops on a dedicated thread (the output stream is not
//! `Send` on every platform) until the stop channel closes.

use std::path::Path;
use std::sync::mpsc;

use anyhow::Result;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct MusicPlayer {
    /// Dropping the sender stops the playback thread.
    stop: Option<mpsc::Sender<()>>,
}

impl MusicPlayer {
    pub fn play(&mut self, track: Option<&Path>) {
        self.stop();
        let Some(track) = track else {
            warn!("Music toggled on but no `music` track is configured");
            return;
        };
        match start(track) {
            Ok(stop) => {
                info!(track = %track.display(), "Music started");
                self.stop = Some(stop);
            }
            Err(e) => warn!(track = %track.display(), "Music playback failed: {e:#}"),
        }
    }

    pub fn stop(&mut self) {
        if self.stop.take().is_some() {
            debug!("Music stopped");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.stop.is_some()
    }
}

#[cfg(not(feature = "audio"))]
fn start(track: &Path) -> Result<mpsc::Sender<()>> {
    anyhow::bail!(
        "cannot play {}: built without the `audio` feature",
        track.display()
    )
}

#[cfg(feature = "audio")]
fn start(track: &Path) -> Result<mpsc::Sender<()>> {
    use anyhow::Context;

    let (samples, channels, sample_rate) = decode(track)?;
    if samples.is_empty() {
        anyhow::bail!("{} contains no samples", track.display());
    }

    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    std::thread::Builder::new()
        .name("fete-music".to_string())
        .spawn(move || {
            if let Err(e) = play_loop(samples, channels, sample_rate, &stop_rx) {
                warn!("Music playback failed: {e:#}");
            }
        })
        .context("Failed to spawn music thread")?;
    Ok(stop_tx)
}

/// Reads a WAV file into interleaved `f32` samples.
#[cfg(feature = "audio")]
fn decode(track: &Path) -> Result<(Vec<f32>, u16, u32)> {
    use anyhow::Context;

    let mut reader = hound::WavReader::open(track)
        .with_context(|| format!("Failed to open {}", track.display()))?;
    let spec = reader.spec();
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to decode float samples")?,
        hound::SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 / scale))
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to decode integer samples")?
        }
    };
    Ok((samples, spec.channels, spec.sample_rate))
}

#[cfg(feature = "audio")]
fn play_loop(
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
    stop: &mpsc::Receiver<()>,
) -> Result<()> {
    use anyhow::Context;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .context("No audio output device")?;
    let config = cpal::StreamConfig {
        channels,
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let mut position = 0;
    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for out in data.iter_mut() {
                    *out = samples[position];
                    position = (position + 1) % samples.len();
                }
            },
            |e| warn!("Audio stream error: {e}"),
            None,
        )
        .context("Failed to open audio output stream")?;
    stream.play().context("Failed to start audio stream")?;

    // Blocks until the sender is dropped.
    let _ = stop.recv();
    Ok(())
}
