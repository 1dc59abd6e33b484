//! Per-session insight tracking
//!
//! Accumulates recurring themes, emotional patterns, and mentioned entities
//! across a session. Purely additive and in-memory; nothing persists across
//! runs.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::analysis::{Analysis, Entity};

/// One user turn with its full analysis, kept in append-only session history
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    /// Raw user input
    pub input: String,
    /// Analysis produced for this turn
    pub analysis: Analysis,
    /// When the turn was recorded
    pub timestamp: DateTime<Utc>,
}

/// One entry in the emotional pattern history
#[derive(Debug, Clone)]
pub struct EmotionalPattern {
    /// Primary emotion of the turn
    pub emotion: String,
    /// Confidence of the primary emotion
    pub confidence: f64,
    /// Primary context of the turn
    pub context: String,
    /// When the pattern was recorded
    pub timestamp: DateTime<Utc>,
}

/// Accumulated insights for one session
///
/// Mutated once per processed turn via [`UserInsights::record`]; growth is
/// unbounded for the session's lifetime.
#[derive(Debug, Default)]
pub struct UserInsights {
    /// Count per primary context, in first-seen order
    pub recurring_themes: IndexMap<String, u32>,
    /// Emotional pattern entries in chronological order
    pub emotional_patterns: Vec<EmotionalPattern>,
    /// Every entity extracted so far, in chronological order
    pub entities_mentioned: Vec<Entity>,
}

impl UserInsights {
    /// Create an empty insight tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one turn's analysis into the aggregates
    pub fn record(&mut self, analysis: &Analysis) {
        self.emotional_patterns.push(EmotionalPattern {
            emotion: analysis.emotion.primary.clone(),
            confidence: analysis.emotion.confidence,
            context: analysis.context.primary.clone(),
            timestamp: analysis.timestamp,
        });

        *self
            .recurring_themes
            .entry(analysis.context.primary.clone())
            .or_insert(0) += 1;

        self.entities_mentioned
            .extend(analysis.entities.iter().cloned());
    }

    /// Summarize the session so far
    #[must_use]
    pub fn summarize(&self, history: &[ConversationTurn]) -> InsightsSummary {
        if history.is_empty() {
            return InsightsSummary::NoData;
        }

        // First-inserted entry wins on equal counts; IndexMap iterates in
        // insertion order, so a strict comparison keeps the earliest maximum
        let most_common_theme = self
            .recurring_themes
            .iter()
            .fold(None::<(&String, u32)>, |top, (theme, count)| match top {
                Some((_, best)) if *count <= best => top,
                _ => Some((theme, *count)),
            })
            .map(|(theme, count)| (theme.clone(), count));

        let recent_emotions: Vec<String> = self
            .emotional_patterns
            .iter()
            .rev()
            .take(5)
            .map(|p| p.emotion.clone())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();

        let distinct: HashSet<&str> = self
            .entities_mentioned
            .iter()
            .map(|e| e.text.as_str())
            .collect();

        InsightsSummary::Report {
            total_turns: history.len(),
            most_common_theme,
            recent_emotions,
            distinct_entities: distinct.len(),
        }
    }
}

/// Result of summarizing a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightsSummary {
    /// No turns processed yet
    NoData,
    /// Aggregate view of the session so far
    Report {
        /// Number of turns processed
        total_turns: usize,
        /// Theme with the highest count, if any turn produced a context
        most_common_theme: Option<(String, u32)>,
        /// Up to five most recent emotions, in chronological order
        recent_emotions: Vec<String>,
        /// Count of distinct entity surface strings (case-sensitive)
        distinct_entities: usize,
    },
}

impl fmt::Display for InsightsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => write!(f, "  No conversation data yet."),
            Self::Report {
                total_turns,
                most_common_theme,
                recent_emotions,
                distinct_entities,
            } => {
                writeln!(f, "  total_conversations: {total_turns}")?;
                match most_common_theme {
                    Some((theme, count)) => {
                        writeln!(f, "  most_common_theme: {theme} ({count})")?;
                    }
                    None => writeln!(f, "  most_common_theme: none")?,
                }
                writeln!(f, "  recent_emotions: {}", recent_emotions.join(", "))?;
                write!(f, "  entities_mentioned: {distinct_entities}")
            }
        }
    }
}
