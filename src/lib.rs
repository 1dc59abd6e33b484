//! Solace - console reflection assistant and speech-to-speech companion
//!
//! This library provides two loosely related conversational assistants:
//! - A text reflection session: four NLP pipelines (sentiment, emotion,
//!   zero-shot topic, NER) feed per-session insight tracking and a templated
//!   empathetic response.
//! - A speech loop: microphone capture, transcription, a scripted reply, and
//!   spoken playback.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │                    Entry points                     │
//! │        Reflection session  │  Speech loop          │
//! └──────────────┬──────────────────────┬──────────────┘
//!                │                      │
//! ┌──────────────▼──────────┐  ┌────────▼──────────────┐
//! │    Analysis / Insights   │  │  Capture / STT / TTS  │
//! │    Composer (templates)  │  │  Playback             │
//! └──────────────┬──────────┘  └────────┬──────────────┘
//!                │                      │
//! ┌──────────────▼──────────────────────▼──────────────┐
//! │     Hosted model services (inference, speech)       │
//! └────────────────────────────────────────────────────┘
//! ```

pub mod analysis;
pub mod compose;
pub mod config;
pub mod error;
pub mod insights;
pub mod session;
pub mod speech;

pub use analysis::{Analysis, Analyzer, Emotion, Entity, Sentiment, TopicContext};
pub use compose::{Composer, Templates};
pub use config::Config;
pub use error::{Error, Result};
pub use insights::{ConversationTurn, InsightsSummary, UserInsights};
pub use session::{Session, SessionCommand};
pub use speech::SpeechLoop;
