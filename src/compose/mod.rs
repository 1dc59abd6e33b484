//! Response composition
//!
//! Builds the reply for one analyzed turn: an acknowledgment, an optional
//! entity clause, a reflection question, and an action suggestion, all drawn
//! from static template tables.

mod templates;

pub use templates::{FALLBACK_QUESTION_KEY, GENERIC_ACKNOWLEDGMENT, GENERIC_ACTIONS, Templates};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

use crate::analysis::Analysis;

/// Emotion confidence above which the question comes from the emotion list
const EMOTION_CONFIDENCE_FLOOR: f64 = 0.8;

/// Context confidence above which the question comes from the context list
const CONTEXT_CONFIDENCE_FLOOR: f64 = 0.6;

/// Entity type tag for people
const ENTITY_PERSON: &str = "PER";

/// Entity type tag for locations
const ENTITY_LOCATION: &str = "LOC";

/// Composes replies from analysis records and template tables
///
/// The random source is injectable so tests can seed it and assert exact
/// output; production uses an entropy-seeded generator.
pub struct Composer {
    templates: Templates,
    rng: Box<dyn RngCore + Send>,
}

impl Composer {
    /// Create a composer with an entropy-seeded random source
    #[must_use]
    pub fn new(templates: Templates) -> Self {
        Self::with_rng(templates, StdRng::from_entropy())
    }

    /// Create a composer with an explicit random source
    #[must_use]
    pub fn with_rng(templates: Templates, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            templates,
            rng: Box::new(rng),
        }
    }

    /// Compose the full reply for one turn: personalised reflection and
    /// action suggestion, separated by a blank line
    pub fn compose(&mut self, analysis: &Analysis) -> String {
        let reflection = self.personalised_reflection(analysis);
        let action = self.action_point(analysis);
        format!("{reflection}\n\n{action}")
    }

    /// Acknowledgment, optional entity clause, and reflection question
    fn personalised_reflection(&mut self, analysis: &Analysis) -> String {
        let emotion = &analysis.emotion.primary;

        let acknowledgment = self
            .templates
            .acknowledgments
            .get(emotion)
            .and_then(|choices| choices.choose(&mut *self.rng))
            .map_or(GENERIC_ACKNOWLEDGMENT, String::as_str)
            .to_string();

        let entity_clause = entity_clause(analysis);
        let question = self.select_question(analysis);

        format!("{acknowledgment}{entity_clause}\n\n{question}")
    }

    /// Emotional summary sentence plus one action suggestion
    fn action_point(&mut self, analysis: &Analysis) -> String {
        let emotion = &analysis.emotion.primary;
        let sentiment = analysis.sentiment.label.to_lowercase();

        let action = self
            .templates
            .actions
            .get(emotion)
            .and_then(|choices| choices.choose(&mut *self.rng))
            .cloned()
            .unwrap_or_else(|| {
                GENERIC_ACTIONS
                    .choose(&mut *self.rng)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            });

        format!(
            "There's a clear feeling of {emotion} in what you expressed, \
             and a kind of {sentiment} tone that lingers as you share.\
             \n\nOne gentle step forward might be: {action} \
             \n\n------------------------------------------------"
        )
    }

    /// Choose the reflection question by the confidence cascade:
    /// high-confidence emotion first, then context, then the generic list
    fn select_question(&mut self, analysis: &Analysis) -> String {
        let emotion = &analysis.emotion.primary;
        let context = &analysis.context.primary;

        let choices = if analysis.emotion.confidence > EMOTION_CONFIDENCE_FLOOR
            && self.templates.questions.contains_key(emotion)
        {
            self.templates.questions.get(emotion)
        } else if analysis.context.confidence > CONTEXT_CONFIDENCE_FLOOR {
            self.templates
                .questions
                .get(context)
                .or_else(|| self.templates.questions.get(FALLBACK_QUESTION_KEY))
        } else {
            self.templates.questions.get(FALLBACK_QUESTION_KEY)
        };

        choices
            .and_then(|list| list.choose(&mut *self.rng))
            .cloned()
            .unwrap_or_default()
    }
}

/// Clause naming the first person entity, else the first location entity
fn entity_clause(analysis: &Analysis) -> String {
    let first_of = |kind: &str| {
        analysis
            .entities
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.text.as_str())
    };

    if let Some(person) = first_of(ENTITY_PERSON) {
        format!(" It sounds like {person} plays an important role in this.")
    } else if let Some(place) = first_of(ENTITY_LOCATION) {
        format!(" And this connection to {place} seems significant.")
    } else {
        String::new()
    }
}
