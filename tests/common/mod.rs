//! Shared test utilities: canned analysis records and fake model clients

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;

use solace::analysis::{
    Analysis, Analyzer, Emotion, EmotionClient, Entity, EntityClient, Sentiment, SentimentClient,
    TopicClient, TopicContext,
};
use solace::{Error, Result};

/// Sentiment client returning a fixed result
pub struct FixedSentiment(pub Sentiment);

#[async_trait]
impl SentimentClient for FixedSentiment {
    async fn classify(&self, _text: &str) -> Result<Sentiment> {
        Ok(self.0.clone())
    }
}

/// Emotion client returning fixed raw label scores
pub struct FixedEmotion(pub Vec<(String, f64)>);

#[async_trait]
impl EmotionClient for FixedEmotion {
    async fn classify(&self, _text: &str) -> Result<Vec<(String, f64)>> {
        Ok(self.0.clone())
    }
}

/// Topic client returning fixed ranked scores
pub struct FixedTopics(pub Vec<(String, f64)>);

#[async_trait]
impl TopicClient for FixedTopics {
    async fn classify(&self, _text: &str, _candidates: &[&str]) -> Result<Vec<(String, f64)>> {
        Ok(self.0.clone())
    }
}

/// Entity client returning fixed spans
pub struct FixedEntities(pub Vec<Entity>);

#[async_trait]
impl EntityClient for FixedEntities {
    async fn extract(&self, _text: &str) -> Result<Vec<Entity>> {
        Ok(self.0.clone())
    }
}

/// Topic client that always fails, for error propagation tests
pub struct FailingTopics;

#[async_trait]
impl TopicClient for FailingTopics {
    async fn classify(&self, _text: &str, _candidates: &[&str]) -> Result<Vec<(String, f64)>> {
        Err(Error::Analysis("topic service unavailable".to_string()))
    }
}

/// Build an analyzer from fixed service outputs
#[must_use]
pub fn fixed_analyzer(
    sentiment: Sentiment,
    emotions: Vec<(String, f64)>,
    topics: Vec<(String, f64)>,
    entities: Vec<Entity>,
) -> Analyzer {
    Analyzer::new(
        Box::new(FixedSentiment(sentiment)),
        Box::new(FixedEmotion(emotions)),
        Box::new(FixedTopics(topics)),
        Box::new(FixedEntities(entities)),
    )
}

/// Positive sentiment with high confidence
#[must_use]
pub fn positive_sentiment() -> Sentiment {
    Sentiment {
        label: "POSITIVE".to_string(),
        confidence: 0.95,
    }
}

/// A person entity span
#[must_use]
pub fn person(name: &str) -> Entity {
    Entity {
        kind: "PER".to_string(),
        text: name.to_string(),
        confidence: 0.99,
    }
}

/// A location entity span
#[must_use]
pub fn location(name: &str) -> Entity {
    Entity {
        kind: "LOC".to_string(),
        text: name.to_string(),
        confidence: 0.97,
    }
}

/// Hand-constructed analysis record with the given primaries
#[must_use]
pub fn analysis(
    emotion: &str,
    emotion_confidence: f64,
    context: &str,
    context_confidence: f64,
) -> Analysis {
    Analysis {
        text: "test input".to_string(),
        sentiment: positive_sentiment(),
        emotion: Emotion {
            primary: emotion.to_string(),
            confidence: emotion_confidence,
            all: vec![(emotion.to_string(), emotion_confidence)],
        },
        context: TopicContext {
            primary: context.to_string(),
            confidence: context_confidence,
            all: vec![(context.to_string(), context_confidence)],
        },
        entities: Vec::new(),
        timestamp: Utc::now(),
    }
}
