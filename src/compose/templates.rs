//! Static response template tables
//!
//! Question, acknowledgment, and action lists keyed by emotion (questions may
//! also be keyed by topic). Built-in defaults are compiled in; a
//! `templates.toml` in the data directory can replace individual lists.

use std::path::Path;

use indexmap::IndexMap;

/// Fallback question key when neither emotion nor context resolves
pub const FALLBACK_QUESTION_KEY: &str = "self_reflection";

/// Generic acknowledgment when an emotion has no configured list
pub const GENERIC_ACKNOWLEDGMENT: &str = "I hear what you're sharing.";

/// Generic action suggestions when an emotion has no configured list
pub const GENERIC_ACTIONS: [&str; 3] = [
    "Reflect on what this moment is revealing about your deeper values.",
    "Note down any insights that emerged from this experience.",
    "Ask yourself: what part of me most needed this moment to happen?",
];

/// Read-only template tables shared by the composer
#[derive(Debug, Clone)]
pub struct Templates {
    /// Reflection questions keyed by emotion or topic
    pub questions: IndexMap<String, Vec<String>>,
    /// Acknowledgment phrases keyed by emotion
    pub acknowledgments: IndexMap<String, Vec<String>>,
    /// Action suggestions keyed by emotion
    pub actions: IndexMap<String, Vec<String>>,
}

/// Per-key overrides loaded from `templates.toml`
#[derive(Debug, Default, serde::Deserialize)]
struct TemplateOverlay {
    #[serde(default)]
    questions: IndexMap<String, Vec<String>>,
    #[serde(default)]
    acknowledgments: IndexMap<String, Vec<String>>,
    #[serde(default)]
    actions: IndexMap<String, Vec<String>>,
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

impl Templates {
    /// Built-in template tables
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn builtin() -> Self {
        let mut questions = IndexMap::new();
        questions.insert(
            "joy".to_string(),
            list(&[
                "What part of this experience meant the most to you?",
                "How did this joy impact the rest of your day?",
                "What can you do to create more moments like this?",
            ]),
        );
        questions.insert(
            "love".to_string(),
            list(&[
                "What makes this connection meaningful to you?",
                "How do you express love when words aren't enough?",
                "What have you learned about yourself through this bond?",
            ]),
        );
        questions.insert(
            "sadness".to_string(),
            list(&[
                "What is this sadness pointing to underneath?",
                "Is there something you're grieving or letting go of?",
                "What might this sadness be trying to teach you?",
            ]),
        );
        questions.insert(
            "anger".to_string(),
            list(&[
                "What value do you feel was violated here?",
                "What would justice look like to you in this moment?",
                "Where is this anger rooted: in fear, hurt, or something else?",
            ]),
        );
        questions.insert(
            "fear".to_string(),
            list(&[
                "What might help you feel a little safer right now?",
                "Is this fear tied to past experience or imagined future?",
                "What small step could build your confidence here?",
            ]),
        );
        questions.insert(
            "surprise".to_string(),
            list(&[
                "What made this so unexpected for you?",
                "Did this surprise bring anything new into perspective?",
                "How are you feeling now that the initial shock has passed?",
            ]),
        );
        questions.insert(
            FALLBACK_QUESTION_KEY.to_string(),
            list(&[
                "What does this tell you about who you're becoming?",
                "What deeper pattern are you noticing in yourself?",
                "How has your perspective changed over time?",
            ]),
        );

        let mut acknowledgments = IndexMap::new();
        acknowledgments.insert(
            "joy".to_string(),
            list(&[
                "I can hear the happiness in what you're sharing.",
                "It sounds like this brings you real joy.",
                "Your words have a bright, joyful tone to them.",
                "That seems like a genuinely uplifting experience for you.",
            ]),
        );
        acknowledgments.insert(
            "love".to_string(),
            list(&[
                "There's such warmth in how you describe this.",
                "I can sense the deep connection you're feeling.",
                "That connection sounds meaningful and sincere.",
                "The way you talk about this shows a lot of care and affection.",
            ]),
        );
        acknowledgments.insert(
            "sadness".to_string(),
            list(&[
                "I hear the heaviness in what you're going through.",
                "It sounds like you're carrying something difficult right now.",
                "This feels like a tender moment, thank you for sharing it.",
                "Your words hold a quiet depth, like something important is beneath them.",
            ]),
        );
        acknowledgments.insert(
            "anger".to_string(),
            list(&[
                "I can feel the intensity of your frustration.",
                "It sounds like something really important to you has been affected.",
                "There's a strong energy behind what you're expressing.",
                "You're clearly standing up for something that matters.",
            ]),
        );
        acknowledgments.insert(
            "fear".to_string(),
            list(&[
                "I hear the uncertainty you're experiencing.",
                "It sounds like you're facing something that feels overwhelming.",
                "That sounds like a situation that would make most people pause.",
                "It's clear you're being honest about what feels unsettling.",
            ]),
        );
        acknowledgments.insert(
            "surprise".to_string(),
            list(&[
                "What an unexpected turn of events.",
                "It sounds like this really caught you off guard.",
                "That shift seems like it really came out of nowhere.",
                "You sound like you're still processing the surprise.",
            ]),
        );

        let mut actions = IndexMap::new();
        actions.insert(
            "joy".to_string(),
            list(&[
                "Write down why this made you feel good.",
                "Take a moment to appreciate what brought you this joy, and maybe share it with someone.",
                "Plan a way to relive or expand this joy in your week ahead.",
                "Celebrate it: small wins matter too.",
            ]),
        );
        actions.insert(
            "love".to_string(),
            list(&[
                "Reach out to the person and let them know.",
                "Reflect on how this feeling of love impacts your daily decisions.",
                "Notice what helps you feel connected, and seek more of it.",
                "Think of a simple way to show this love through action.",
            ]),
        );
        actions.insert(
            "sadness".to_string(),
            list(&[
                "Do something gentle: rest, walk, or write.",
                "Let yourself sit with the sadness without trying to fix it.",
                "Talk to someone who listens well, even if you just need quiet company.",
                "Reflect on what this sadness is asking you to pay attention to.",
            ]),
        );
        actions.insert(
            "anger".to_string(),
            list(&[
                "Write a letter you won't send.",
                "Name exactly what triggered the anger, without judgement.",
                "Move your body to release that built-up energy.",
                "Notice what your anger might be protecting or standing up for.",
            ]),
        );
        actions.insert(
            "fear".to_string(),
            list(&[
                "List what you *can* control in this situation.",
                "Write out the fear in detail; sometimes clarity helps soften it.",
                "Try grounding yourself with breath, then re-read what scared you.",
                "Ask yourself: what would you do if you trusted yourself more?",
            ]),
        );
        actions.insert(
            "surprise".to_string(),
            list(&[
                "Reflect on how you typically handle the unexpected.",
                "Note what exactly caught you off guard and why.",
                "Think about whether this opened a new opportunity.",
                "Share the story with someone; it might bring new perspective.",
            ]),
        );

        Self {
            questions,
            acknowledgments,
            actions,
        }
    }

    /// Load templates: built-in defaults plus any `templates.toml` overrides
    ///
    /// Parse failures are logged and the defaults kept, so a broken override
    /// file never takes the session down.
    #[must_use]
    pub fn load(data_dir: &Path) -> Self {
        let mut templates = Self::builtin();

        let path = data_dir.join("templates.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str::<TemplateOverlay>(&content) {
                    Ok(overlay) => {
                        tracing::info!(path = %path.display(), "loaded template overrides");
                        templates.apply(overlay);
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "failed to parse template overrides, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to read template overrides"
                    );
                }
            }
        }

        templates
    }

    /// Replace per-key lists with entries from an overlay
    fn apply(&mut self, overlay: TemplateOverlay) {
        self.questions.extend(overlay.questions);
        self.acknowledgments.extend(overlay.acknowledgments);
        self.actions.extend(overlay.actions);
    }
}
