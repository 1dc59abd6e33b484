//! Text-to-speech (TTS) processing

use std::path::{Path, PathBuf};

use futures::StreamExt;

use crate::{Error, Result};

/// Synthesizes speech from text via the `OpenAI` speech API
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    voice: String,
    speed: f64,
    model: String,
}

impl TextToSpeech {
    /// Create a new TTS instance
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(api_key: String, voice: String, speed: f64, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("OpenAI API key required for TTS".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice,
            speed,
            model,
        })
    }

    /// Synthesize text to speech, buffering the streamed chunks fully
    ///
    /// # Returns
    ///
    /// Audio bytes (MP3 format)
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f64,
        }

        let request = TtsRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            speed: self.speed,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("TTS API error {status}: {body}")));
        }

        // Accumulate the streamed body before playback starts
        let mut stream = response.bytes_stream();
        let mut audio = Vec::new();
        while let Some(chunk) = stream.next().await {
            audio.extend_from_slice(&chunk?);
        }

        tracing::debug!(bytes = audio.len(), "synthesis complete");
        Ok(audio)
    }
}

/// Save synthesized audio as a timestamp-named MP3 in the output directory
///
/// # Errors
///
/// Returns error if the directory cannot be created or the file written
pub fn save_audio(dir: &Path, audio: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = dir.join(format!("reflection_{stamp}.mp3"));
    std::fs::write(&path, audio)?;

    tracing::debug!(path = %path.display(), bytes = audio.len(), "audio saved");
    Ok(path)
}
