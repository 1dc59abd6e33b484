//! Hugging Face Inference API clients
//!
//! One thin client per pipeline; each posts the input text to the hosted
//! model and parses the documented response shape.

use serde_json::json;

use super::{Entity, Sentiment};
use crate::{Error, Result};

/// Base URL for the hosted inference API
const INFERENCE_BASE: &str = "https://api-inference.huggingface.co/models";

/// A single label/score pair from a text-classification pipeline
#[derive(serde::Deserialize)]
struct ClassScore {
    label: String,
    score: f64,
}

/// Response from the zero-shot classification pipeline
#[derive(serde::Deserialize)]
struct ZeroShotResponse {
    labels: Vec<String>,
    scores: Vec<f64>,
}

/// One aggregated span from the NER pipeline
#[derive(serde::Deserialize)]
struct NerSpan {
    entity_group: String,
    word: String,
    score: f64,
}

/// Issue one inference request and return the verified response
async fn post_inference(
    client: &reqwest::Client,
    model: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Result<reqwest::Response> {
    let url = format!("{INFERENCE_BASE}/{model}");
    tracing::debug!(model, "sending inference request");

    let mut request = client.post(&url).json(body);
    if let Some(token) = token {
        request = request.header("Authorization", format!("Bearer {token}"));
    }

    let response = request.send().await.map_err(|e| {
        tracing::error!(model, error = %e, "inference request failed");
        e
    })?;

    let status = response.status();
    tracing::debug!(model, status = %status, "received response");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(model, status = %status, body = %body, "inference API error");
        return Err(Error::Analysis(format!(
            "{model} returned {status}: {body}"
        )));
    }

    Ok(response)
}

/// Sentiment classification over the inference API
pub struct HfSentiment {
    client: reqwest::Client,
    model: String,
    token: Option<String>,
}

impl HfSentiment {
    /// Create a sentiment client for the given model
    #[must_use]
    pub fn new(model: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model,
            token,
        }
    }
}

#[async_trait::async_trait]
impl super::SentimentClient for HfSentiment {
    async fn classify(&self, text: &str) -> Result<Sentiment> {
        let response = post_inference(
            &self.client,
            &self.model,
            self.token.as_deref(),
            &json!({ "inputs": text }),
        )
        .await?;

        // Single-input requests come back as one row of label scores
        let rows: Vec<Vec<ClassScore>> = response.json().await?;
        let top = rows
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| Error::Analysis("sentiment model returned no labels".to_string()))?;

        Ok(Sentiment {
            label: top.label,
            confidence: top.score,
        })
    }
}

/// Emotion classification over the inference API
pub struct HfEmotion {
    client: reqwest::Client,
    model: String,
    token: Option<String>,
}

impl HfEmotion {
    /// Create an emotion client for the given model
    #[must_use]
    pub fn new(model: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model,
            token,
        }
    }
}

#[async_trait::async_trait]
impl super::EmotionClient for HfEmotion {
    async fn classify(&self, text: &str) -> Result<Vec<(String, f64)>> {
        let response = post_inference(
            &self.client,
            &self.model,
            self.token.as_deref(),
            &json!({ "inputs": text }),
        )
        .await?;

        let rows: Vec<Vec<ClassScore>> = response.json().await?;
        Ok(rows
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|c| (c.label, c.score))
            .collect())
    }
}

/// Zero-shot topic classification over the inference API
pub struct HfZeroShot {
    client: reqwest::Client,
    model: String,
    token: Option<String>,
}

impl HfZeroShot {
    /// Create a zero-shot client for the given model
    #[must_use]
    pub fn new(model: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model,
            token,
        }
    }
}

#[async_trait::async_trait]
impl super::TopicClient for HfZeroShot {
    async fn classify(&self, text: &str, candidates: &[&str]) -> Result<Vec<(String, f64)>> {
        let response = post_inference(
            &self.client,
            &self.model,
            self.token.as_deref(),
            &json!({
                "inputs": text,
                "parameters": { "candidate_labels": candidates },
            }),
        )
        .await?;

        let result: ZeroShotResponse = response.json().await?;
        Ok(result.labels.into_iter().zip(result.scores).collect())
    }
}

/// Named-entity recognition over the inference API
pub struct HfEntities {
    client: reqwest::Client,
    model: String,
    token: Option<String>,
}

impl HfEntities {
    /// Create a NER client for the given model
    #[must_use]
    pub fn new(model: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model,
            token,
        }
    }
}

#[async_trait::async_trait]
impl super::EntityClient for HfEntities {
    async fn extract(&self, text: &str) -> Result<Vec<Entity>> {
        let response = post_inference(
            &self.client,
            &self.model,
            self.token.as_deref(),
            &json!({
                "inputs": text,
                "parameters": { "aggregation_strategy": "simple" },
            }),
        )
        .await?;

        let spans: Vec<NerSpan> = response.json().await?;
        Ok(spans
            .into_iter()
            .map(|s| Entity {
                kind: s.entity_group,
                text: s.word,
                confidence: s.score,
            })
            .collect())
    }
}
