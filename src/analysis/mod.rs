//! Text analysis pipeline
//!
//! Fans a user turn through four independent model services (sentiment,
//! emotion, topic, named entities) and normalizes each raw response into a
//! stable record shape. The services sit behind traits so tests can supply
//! canned results without any network access.

mod hf;

pub use hf::{HfEmotion, HfEntities, HfSentiment, HfZeroShot};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::{AnalysisConfig, ApiKeys};
use crate::Result;

/// Candidate topics for zero-shot context classification
pub const CANDIDATE_TOPICS: [&str; 13] = [
    "relationships",
    "work stress",
    "self-reflection",
    "family",
    "health",
    "change transition",
    "daily life",
    "personal growth",
    "anxiety",
    "depression",
    "motivation",
    "goals",
    "past experiences",
];

/// Maps raw emotion model labels to readable emotions
const EMOTION_LABELS: [(&str, &str); 6] = [
    ("LABEL_0", "sadness"),
    ("LABEL_1", "joy"),
    ("LABEL_2", "love"),
    ("LABEL_3", "anger"),
    ("LABEL_4", "fear"),
    ("LABEL_5", "surprise"),
];

/// Sentiment of one input: the single highest-scoring label
#[derive(Debug, Clone, PartialEq)]
pub struct Sentiment {
    /// Sentiment label (e.g. "POSITIVE")
    pub label: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

/// Emotional tone of one input
#[derive(Debug, Clone, PartialEq)]
pub struct Emotion {
    /// Primary emotion (argmax of `all`, first-seen wins on ties)
    pub primary: String,
    /// Confidence of the primary emotion
    pub confidence: f64,
    /// All detected emotions with scores
    pub all: Vec<(String, f64)>,
}

/// Topic context of one input
#[derive(Debug, Clone, PartialEq)]
pub struct TopicContext {
    /// Primary context (top-ranked candidate label)
    pub primary: String,
    /// Confidence of the primary context
    pub confidence: f64,
    /// All candidate labels with scores, ranked descending
    pub all: Vec<(String, f64)>,
}

/// One extracted entity span
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Entity type tag as emitted by the NER service ("PER", "LOC", ...)
    pub kind: String,
    /// Extracted surface text
    pub text: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

/// Full analysis of one user turn
///
/// Created fresh per turn and never mutated afterwards; copies are retained
/// in conversation history and insight aggregates.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The analyzed input text
    pub text: String,
    /// Sentiment result
    pub sentiment: Sentiment,
    /// Emotion result
    pub emotion: Emotion,
    /// Topic context result
    pub context: TopicContext,
    /// Extracted entities, in model order
    pub entities: Vec<Entity>,
    /// When the analysis was produced
    pub timestamp: DateTime<Utc>,
}

/// Sentiment classification service
#[async_trait]
pub trait SentimentClient: Send + Sync {
    /// Classify sentiment, returning the single highest-scoring label
    async fn classify(&self, text: &str) -> Result<Sentiment>;
}

/// Emotion classification service returning raw per-class scores
#[async_trait]
pub trait EmotionClient: Send + Sync {
    /// Score the input against the model's fixed emotion classes
    async fn classify(&self, text: &str) -> Result<Vec<(String, f64)>>;
}

/// Zero-shot topic classification service
#[async_trait]
pub trait TopicClient: Send + Sync {
    /// Score the input against the candidate labels, ranked descending
    async fn classify(&self, text: &str, candidates: &[&str]) -> Result<Vec<(String, f64)>>;
}

/// Named-entity recognition service
#[async_trait]
pub trait EntityClient: Send + Sync {
    /// Extract entity spans from the input
    async fn extract(&self, text: &str) -> Result<Vec<Entity>>;
}

/// Runs all four analysis services over a turn's text
pub struct Analyzer {
    sentiment: Box<dyn SentimentClient>,
    emotion: Box<dyn EmotionClient>,
    topic: Box<dyn TopicClient>,
    entities: Box<dyn EntityClient>,
}

impl Analyzer {
    /// Create an analyzer from explicit service clients
    #[must_use]
    pub fn new(
        sentiment: Box<dyn SentimentClient>,
        emotion: Box<dyn EmotionClient>,
        topic: Box<dyn TopicClient>,
        entities: Box<dyn EntityClient>,
    ) -> Self {
        Self {
            sentiment,
            emotion,
            topic,
            entities,
        }
    }

    /// Create an analyzer backed by the Hugging Face Inference API
    #[must_use]
    pub fn from_config(config: &AnalysisConfig, keys: &ApiKeys) -> Self {
        let token = keys.huggingface.clone();
        Self::new(
            Box::new(HfSentiment::new(config.sentiment_model.clone(), token.clone())),
            Box::new(HfEmotion::new(config.emotion_model.clone(), token.clone())),
            Box::new(HfZeroShot::new(config.zero_shot_model.clone(), token.clone())),
            Box::new(HfEntities::new(config.ner_model.clone(), token)),
        )
    }

    /// Run all four analyses over the input text
    ///
    /// Any service failure propagates unchanged; no retries, no partial
    /// results. Empty input is rejected by the session loop, not here.
    ///
    /// # Errors
    ///
    /// Returns error if any underlying service call fails
    pub async fn analyze(&self, text: &str) -> Result<Analysis> {
        let sentiment = self.sentiment.classify(text).await?;
        let raw_emotions = self.emotion.classify(text).await?;
        let topics = self.topic.classify(text, &CANDIDATE_TOPICS).await?;
        let entities = self.entities.extract(text).await?;

        let emotion = normalize_emotions(raw_emotions);
        let context = normalize_topics(topics);

        tracing::debug!(
            sentiment = %sentiment.label,
            emotion = %emotion.primary,
            context = %context.primary,
            entities = entities.len(),
            "analysis complete"
        );

        Ok(Analysis {
            text: text.to_string(),
            sentiment,
            emotion,
            context,
            entities,
            timestamp: Utc::now(),
        })
    }
}

/// Map a raw emotion model label to its readable name
///
/// Unrecognized labels pass through unchanged rather than failing.
#[must_use]
pub fn map_emotion_label(raw: &str) -> &str {
    EMOTION_LABELS
        .iter()
        .find(|(label, _)| *label == raw)
        .map_or(raw, |(_, name)| name)
}

/// Normalize raw emotion scores: remap labels and pick the stable argmax
fn normalize_emotions(raw: Vec<(String, f64)>) -> Emotion {
    let all: Vec<(String, f64)> = raw
        .into_iter()
        .map(|(label, score)| (map_emotion_label(&label).to_string(), score))
        .collect();

    let (primary, confidence) = all
        .iter()
        .fold(None::<(&str, f64)>, |top, (label, score)| match top {
            // Strict comparison keeps the first maximal entry on ties
            Some((_, best)) if *score <= best => top,
            _ => Some((label.as_str(), *score)),
        })
        .map_or_else(|| (String::new(), 0.0), |(l, s)| (l.to_string(), s));

    Emotion {
        primary,
        confidence,
        all,
    }
}

/// Normalize zero-shot results: the service returns labels pre-sorted
/// descending, so the primary context is the first entry
fn normalize_topics(all: Vec<(String, f64)>) -> TopicContext {
    let (primary, confidence) = all
        .first()
        .map_or_else(|| (String::new(), 0.0), |(l, s)| (l.clone(), *s));

    TopicContext {
        primary,
        confidence,
        all,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emotion_labels_remap() {
        assert_eq!(map_emotion_label("LABEL_0"), "sadness");
        assert_eq!(map_emotion_label("LABEL_5"), "surprise");
    }

    #[test]
    fn unknown_emotion_label_passes_through() {
        assert_eq!(map_emotion_label("LABEL_9"), "LABEL_9");
        assert_eq!(map_emotion_label("curiosity"), "curiosity");
    }

    #[test]
    fn emotion_argmax_is_stable_on_ties() {
        let emotion = normalize_emotions(vec![
            ("LABEL_1".to_string(), 0.4),
            ("LABEL_3".to_string(), 0.4),
            ("LABEL_0".to_string(), 0.2),
        ]);
        assert_eq!(emotion.primary, "joy");
        assert!((emotion.confidence - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn topic_primary_is_first_entry() {
        let context = normalize_topics(vec![
            ("work stress".to_string(), 0.7),
            ("daily life".to_string(), 0.2),
        ]);
        assert_eq!(context.primary, "work stress");
        assert!((context.confidence - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn thirteen_candidate_topics() {
        assert_eq!(CANDIDATE_TOPICS.len(), 13);
    }
}
