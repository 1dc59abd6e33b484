//! Audio capture from microphone

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};

use crate::{Error, Result};

/// Sample rate for audio capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// Ambient noise calibration window before each listen
const CALIBRATION: Duration = Duration::from_millis(500);

/// How long to wait for speech onset before giving up
const ONSET_TIMEOUT: Duration = Duration::from_secs(2);

/// Poll interval while listening
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Silence duration that ends an utterance (in samples at 16kHz)
const SILENCE_SAMPLES: usize = 12800; // 0.8 seconds

/// Floor for the speech energy threshold, regardless of ambient level
const MIN_ENERGY_THRESHOLD: f32 = 0.015;

/// Outcome of one listen attempt
#[derive(Debug)]
pub enum ListenOutcome {
    /// A complete utterance was captured
    Captured(Vec<f32>),
    /// No speech was detected within the onset timeout
    Timeout,
}

/// Captures audio from the default input device
pub struct AudioCapture {
    #[allow(dead_code)]
    device: Device,
    config: StreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
    stream: Option<Stream>,
}

impl AudioCapture {
    /// Create a new audio capture instance
    ///
    /// # Errors
    ///
    /// Returns error if audio device cannot be opened
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device available".to_string()))?;

        let supported_config = device
            .supported_input_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
            })
            .ok_or_else(|| Error::Audio("no suitable audio config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = SAMPLE_RATE,
            channels = config.channels,
            "audio capture initialized"
        );

        Ok(Self {
            device,
            config,
            buffer: Arc::new(Mutex::new(Vec::new())),
            stream: None,
        })
    }

    /// Start capturing audio
    ///
    /// # Errors
    ///
    /// Returns error if capture fails
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let buffer = Arc::clone(&self.buffer);
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device".to_string()))?;

        let config = self.config.clone();

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio capture error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        self.stream = Some(stream);

        tracing::debug!("audio capture started");
        Ok(())
    }

    /// Stop capturing audio
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            tracing::debug!("audio capture stopped");
        }
    }

    /// Get captured audio buffer and clear it
    #[must_use]
    pub fn take_buffer(&self) -> Vec<f32> {
        self.buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default()
    }

    /// Get captured audio buffer without clearing
    #[must_use]
    pub fn peek_buffer(&self) -> Vec<f32> {
        self.buffer
            .lock()
            .map(|buf| buf.clone())
            .unwrap_or_default()
    }

    /// Clear the audio buffer
    pub fn clear_buffer(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
    }

    /// Get the sample rate
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    /// Listen for one utterance
    ///
    /// Calibrates against ambient noise first, then waits up to the onset
    /// timeout for speech to start. Once speech starts, recording continues
    /// until a silence gap or `max_secs` of audio, whichever comes first.
    ///
    /// # Errors
    ///
    /// Returns error if the capture stream cannot be started
    #[allow(clippy::cast_possible_truncation)]
    pub async fn listen(&mut self, max_secs: u64) -> Result<ListenOutcome> {
        self.start()?;
        self.clear_buffer();

        // Calibrate: the ambient floor sets the speech threshold
        tokio::time::sleep(CALIBRATION).await;
        let ambient = rms(&self.take_buffer());
        let threshold = (ambient * 2.0).max(MIN_ENERGY_THRESHOLD);
        tracing::debug!(ambient, threshold, "ambient noise calibrated");

        // Wait for speech onset
        let onset_deadline = std::time::Instant::now() + ONSET_TIMEOUT;
        let mut utterance: Vec<f32> = Vec::new();
        loop {
            tokio::time::sleep(POLL_INTERVAL).await;
            let chunk = self.take_buffer();
            if rms(&chunk) > threshold {
                utterance.extend_from_slice(&chunk);
                break;
            }
            if std::time::Instant::now() > onset_deadline {
                tracing::debug!("no speech detected within timeout period");
                return Ok(ListenOutcome::Timeout);
            }
        }

        // Record until silence or the maximum utterance length
        let max_samples = (max_secs * u64::from(SAMPLE_RATE)) as usize;
        let mut silence: usize = 0;
        while utterance.len() < max_samples && silence < SILENCE_SAMPLES {
            tokio::time::sleep(POLL_INTERVAL).await;
            let chunk = self.take_buffer();
            if rms(&chunk) > threshold {
                silence = 0;
            } else {
                silence += chunk.len();
            }
            utterance.extend_from_slice(&chunk);
        }

        tracing::debug!(samples = utterance.len(), "utterance captured");
        Ok(ListenOutcome::Captured(utterance))
    }
}

/// RMS energy of a sample buffer
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Convert f32 samples to WAV bytes for STT APIs
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            // Convert f32 [-1.0, 1.0] to i16
            #[allow(clippy::cast_possible_truncation)]
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}
