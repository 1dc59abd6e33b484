//! Configuration management for Solace

use std::path::PathBuf;

use crate::Result;

/// Solace configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to data directory (template overrides, saved audio)
    pub data_dir: PathBuf,

    /// API keys
    pub api_keys: ApiKeys,

    /// Analysis model identifiers
    pub analysis: AnalysisConfig,

    /// Voice configuration
    pub voice: VoiceConfig,
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Hugging Face API token (for the four inference pipelines)
    pub huggingface: Option<String>,

    /// `OpenAI` API key (for Whisper and TTS)
    pub openai: Option<String>,
}

/// Model identifiers for the analysis pipelines
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Sentiment classification model
    pub sentiment_model: String,

    /// Emotion classification model (six fixed output classes)
    pub emotion_model: String,

    /// Zero-shot topic classification model
    pub zero_shot_model: String,

    /// Named-entity recognition model
    pub ner_model: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sentiment_model: "distilbert/distilbert-base-uncased-finetuned-sst-2-english"
                .to_string(),
            emotion_model: "hamzawaheed/emotion-classification-model".to_string(),
            zero_shot_model: "facebook/bart-large-mnli".to_string(),
            ner_model: "dslim/distilbert-NER".to_string(),
        }
    }
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f64,

    /// Maximum listen duration per utterance, in seconds
    pub listen_secs: u64,

    /// Directory for saved response audio; `None` disables saving
    pub audio_dir: Option<PathBuf>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            stt_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
            tts_speed: 1.0,
            listen_secs: 10,
            audio_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns error if the data directory cannot be determined
    pub fn load() -> Result<Self> {
        let api_keys = ApiKeys {
            huggingface: std::env::var("HF_API_TOKEN").ok(),
            openai: std::env::var("OPENAI_API_KEY").ok(),
        };

        let defaults = AnalysisConfig::default();
        let analysis = AnalysisConfig {
            sentiment_model: std::env::var("SOLACE_SENTIMENT_MODEL")
                .unwrap_or(defaults.sentiment_model),
            emotion_model: std::env::var("SOLACE_EMOTION_MODEL")
                .unwrap_or(defaults.emotion_model),
            zero_shot_model: std::env::var("SOLACE_ZERO_SHOT_MODEL")
                .unwrap_or(defaults.zero_shot_model),
            ner_model: std::env::var("SOLACE_NER_MODEL").unwrap_or(defaults.ner_model),
        };

        let voice_defaults = VoiceConfig::default();
        let voice = VoiceConfig {
            stt_model: std::env::var("SOLACE_STT_MODEL").unwrap_or(voice_defaults.stt_model),
            tts_model: std::env::var("SOLACE_TTS_MODEL").unwrap_or(voice_defaults.tts_model),
            tts_voice: std::env::var("SOLACE_TTS_VOICE").unwrap_or(voice_defaults.tts_voice),
            tts_speed: std::env::var("SOLACE_TTS_SPEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(voice_defaults.tts_speed),
            listen_secs: std::env::var("SOLACE_LISTEN_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(voice_defaults.listen_secs),
            audio_dir: std::env::var("SOLACE_AUDIO_DIR").ok().map(PathBuf::from),
        };

        // Determine data directory (~/.local/share/solace on Linux)
        let data_dir = directories::ProjectDirs::from("dev", "solace", "solace")
            .map_or_else(|| PathBuf::from("."), |d| d.data_dir().to_path_buf());

        // Ensure data dir exists
        std::fs::create_dir_all(&data_dir).ok();

        Ok(Self {
            data_dir,
            api_keys,
            analysis,
            voice,
        })
    }
}
