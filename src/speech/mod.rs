//! Speech-to-speech conversation loop
//!
//! Independent of the reflection session: microphone capture, Whisper
//! transcription, a scripted keyword reply, streaming synthesis, and
//! in-memory playback, repeated until a stop phrase or interrupt. Each turn
//! moves from listening to responding; cleanup runs on every exit path.

mod capture;
mod playback;
mod stt;
mod tts;

pub use capture::{AudioCapture, ListenOutcome, SAMPLE_RATE, rms, samples_to_wav};
pub use playback::AudioPlayback;
pub use stt::SpeechToText;
pub use tts::{TextToSpeech, save_audio};

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::Config;
use crate::{Error, Result};

/// Words that end the conversation when heard in input or echoed in a reply
const STOP_WORDS: [&str; 5] = ["stop", "quit", "bye", "goodbye", "cya"];

/// Spoken when audio was unintelligible or transcription failed
const APOLOGY: &str = "I'm sorry, I didn't catch that. Could you please repeat?";

/// Pause between turns
const TURN_DELAY: Duration = Duration::from_millis(500);

/// Whether the loop continues after a turn
#[derive(Debug, PartialEq, Eq)]
enum TurnFlow {
    Continue,
    Stop,
}

/// Flow after a reply attempt
///
/// Synthesis or playback failures are transient: log and keep the
/// conversation going. A stop phrase still ends it even when the farewell
/// could not be spoken.
fn flow_after_reply(delivered: Result<()>, stopping: bool) -> TurnFlow {
    if let Err(e) = delivered {
        tracing::warn!(error = %e, "failed to deliver reply");
    }

    if stopping {
        TurnFlow::Stop
    } else {
        TurnFlow::Continue
    }
}

/// Scripted reply for a transcribed utterance, by keyword containment
#[must_use]
pub fn scripted_reply(input: &str) -> String {
    let lowered = input.to_lowercase();

    if lowered.contains("hello") {
        "Hello there! How can I help you today?".to_string()
    } else if lowered.contains("how are you") {
        "I'm doing great, thank you for asking!".to_string()
    } else if lowered.contains("bye") || lowered.contains("goodbye") {
        "Goodbye! It was nice talking with you.".to_string()
    } else if lowered.contains("stop") || lowered.contains("quit") {
        "Stopping the conversation. See you later!".to_string()
    } else {
        format!("I heard you say: {input}. That's interesting!")
    }
}

/// Whether the utterance contains a stop or farewell word
#[must_use]
pub fn wants_stop(input: &str) -> bool {
    let lowered = input.to_lowercase();
    STOP_WORDS.iter().any(|w| lowered.contains(w))
}

/// The speech-to-speech conversation loop
pub struct SpeechLoop {
    capture: AudioCapture,
    playback: AudioPlayback,
    stt: SpeechToText,
    tts: TextToSpeech,
    listen_secs: u64,
    audio_dir: Option<PathBuf>,
}

impl SpeechLoop {
    /// Create the loop from configuration, opening both audio devices
    ///
    /// # Errors
    ///
    /// Returns error if the `OpenAI` key is missing or a device cannot open
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_keys
            .openai
            .clone()
            .ok_or_else(|| Error::Config("OPENAI_API_KEY required for speech mode".to_string()))?;

        Ok(Self {
            capture: AudioCapture::new()?,
            playback: AudioPlayback::new()?,
            stt: SpeechToText::new(api_key.clone(), config.voice.stt_model.clone())?,
            tts: TextToSpeech::new(
                api_key,
                config.voice.tts_voice.clone(),
                config.voice.tts_speed,
                config.voice.tts_model.clone(),
            )?,
            listen_secs: config.voice.listen_secs,
            audio_dir: config.voice.audio_dir.clone(),
        })
    }

    /// Run the conversation until a stop phrase or interrupt
    ///
    /// # Errors
    ///
    /// Returns error on unrecoverable audio or device failure
    pub async fn run(&mut self) -> Result<()> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(()).await;
            }
        });

        println!("Say 'stop' or 'quit' to end the conversation");

        let result = loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("interrupt received, ending conversation");
                    break Ok(());
                }
                flow = self.turn() => match flow {
                    Ok(TurnFlow::Continue) => {}
                    Ok(TurnFlow::Stop) => break Ok(()),
                    Err(e) => break Err(e),
                },
            }
        };

        // Release audio resources regardless of how the loop ended
        self.capture.stop();
        println!("Thank you for the conversation!");
        result
    }

    /// One listen/respond turn
    async fn turn(&mut self) -> Result<TurnFlow> {
        println!("Listening... (speak now)");

        let samples = match self.capture.listen(self.listen_secs).await? {
            ListenOutcome::Captured(samples) => samples,
            ListenOutcome::Timeout => {
                println!("Listening again...");
                return Ok(TurnFlow::Continue);
            }
        };

        let wav = samples_to_wav(&samples, SAMPLE_RATE)?;
        let (reply, stopping) = match self.stt.transcribe(&wav).await {
            Ok(text) if text.trim().is_empty() => {
                tracing::debug!("transcription was empty");
                (APOLOGY.to_string(), false)
            }
            Ok(text) => {
                println!("You said: '{text}'");
                (scripted_reply(&text), wants_stop(&text))
            }
            Err(e) => {
                tracing::warn!(error = %e, "transcription failed");
                (APOLOGY.to_string(), false)
            }
        };

        println!("Response: {reply}");
        let delivered = self.respond(&reply).await;

        tokio::time::sleep(TURN_DELAY).await;

        Ok(flow_after_reply(delivered, stopping))
    }

    /// Synthesize the reply, optionally save it, and play it from memory
    async fn respond(&mut self, text: &str) -> Result<()> {
        let audio = self.tts.synthesize(text).await?;

        if let Some(dir) = &self.audio_dir {
            if let Err(e) = save_audio(dir, &audio) {
                tracing::warn!(error = %e, "failed to save response audio");
            }
        }

        self.playback.play_mp3(&audio).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_reply() {
        assert_eq!(
            scripted_reply("Hello, assistant"),
            "Hello there! How can I help you today?"
        );
    }

    #[test]
    fn status_reply() {
        assert_eq!(
            scripted_reply("so, how are you doing"),
            "I'm doing great, thank you for asking!"
        );
    }

    #[test]
    fn farewell_takes_priority_over_stop() {
        assert_eq!(
            scripted_reply("goodbye, and stop"),
            "Goodbye! It was nice talking with you."
        );
    }

    #[test]
    fn default_reply_echoes_input() {
        let reply = scripted_reply("the weather is nice");
        assert!(reply.contains("the weather is nice"));
    }

    #[test]
    fn failed_delivery_keeps_conversation_going() {
        let delivered = Err(Error::Tts("speech API returned 500".to_string()));
        assert_eq!(flow_after_reply(delivered, false), TurnFlow::Continue);
    }

    #[test]
    fn failed_delivery_still_honors_stop_phrase() {
        let delivered = Err(Error::Tts("speech API returned 500".to_string()));
        assert_eq!(flow_after_reply(delivered, true), TurnFlow::Stop);
    }

    #[test]
    fn delivered_reply_stops_only_on_stop_phrase() {
        assert_eq!(flow_after_reply(Ok(()), false), TurnFlow::Continue);
        assert_eq!(flow_after_reply(Ok(()), true), TurnFlow::Stop);
    }

    #[test]
    fn stop_word_detection() {
        assert!(wants_stop("please STOP now"));
        assert!(wants_stop("cya later"));
        assert!(wants_stop("goodbye friend"));
        assert!(!wants_stop("tell me a story"));
    }
}
