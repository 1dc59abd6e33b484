//! Console reflection session
//!
//! Line-based read-eval-print loop: each turn runs analysis, folds the result
//! into the session insights, and prints a composed reflection. A single
//! failed turn never ends the session; ctrl-c does.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::analysis::Analyzer;
use crate::compose::Composer;
use crate::insights::{ConversationTurn, UserInsights};
use crate::Result;

/// Exit keywords, matched case-insensitively after trimming
const EXIT_WORDS: [&str; 4] = ["quit", "exit", "bye", "cya"];

/// Keyword that prints the session summary instead of consuming a turn
const INSIGHTS_WORD: &str = "insights";

/// Printed when the session ends, on exit word or interrupt
const GOODBYE: &str = "\nThanks for the chat. Take care!";

/// One parsed line of session input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// End the session
    Quit,
    /// Print accumulated insights
    Insights,
    /// Blank or whitespace-only input
    Empty,
    /// A turn to reflect on
    Reflect(String),
}

impl SessionCommand {
    /// Parse one raw input line
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let lowered = trimmed.to_lowercase();

        if EXIT_WORDS.contains(&lowered.as_str()) {
            Self::Quit
        } else if lowered == INSIGHTS_WORD {
            Self::Insights
        } else if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Reflect(trimmed.to_string())
        }
    }
}

/// One reflection session: analyzer, composer, and accumulated state
pub struct Session {
    analyzer: Analyzer,
    composer: Composer,
    insights: UserInsights,
    history: Vec<ConversationTurn>,
}

impl Session {
    /// Create a new session with empty history
    #[must_use]
    pub fn new(analyzer: Analyzer, composer: Composer) -> Self {
        Self {
            analyzer,
            composer,
            insights: UserInsights::new(),
            history: Vec::new(),
        }
    }

    /// Number of turns processed so far
    #[must_use]
    pub fn turns(&self) -> usize {
        self.history.len()
    }

    /// Accumulated insights for the session
    #[must_use]
    pub fn insights(&self) -> &UserInsights {
        &self.insights
    }

    /// Append-only history of processed turns
    #[must_use]
    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Process one turn end-to-end: analyze, track, remember, compose
    ///
    /// # Errors
    ///
    /// Returns error if any analysis service call fails; session state is
    /// only updated on success
    pub async fn process_turn(&mut self, input: &str) -> Result<String> {
        let analysis = self.analyzer.analyze(input).await?;

        self.insights.record(&analysis);
        self.history.push(ConversationTurn {
            input: input.to_string(),
            timestamp: analysis.timestamp,
            analysis: analysis.clone(),
        });

        Ok(self.composer.compose(&analysis))
    }

    /// Run the read-eval-print loop until an exit word or interrupt
    ///
    /// # Errors
    ///
    /// Returns error only if stdin itself fails; turn failures are logged
    /// and the loop continues
    pub async fn run(&mut self) -> Result<()> {
        // Interrupt handling mirrors the daemon: a spawned ctrl-c watcher
        // feeding a shutdown channel the loop selects against
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(()).await;
            }
        });

        println!("Welcome to your Reflection Assistant!");
        println!("Type 'insights' for patterns, or 'quit' to end.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            println!("\nWhat is something you'd like to reflect on today?");

            let line = tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("interrupt received, ending session");
                    break;
                }
                line = lines.next_line() => line?,
            };

            let Some(line) = line else {
                // stdin closed
                break;
            };

            match SessionCommand::parse(&line) {
                SessionCommand::Quit => break,
                SessionCommand::Insights => {
                    println!("{}", self.insights.summarize(&self.history));
                }
                SessionCommand::Empty => {
                    println!("I'm here when you're ready.");
                }
                SessionCommand::Reflect(text) => {
                    match self.process_turn(&text).await {
                        Ok(response) => println!("\n{response}"),
                        Err(e) => {
                            tracing::error!(error = %e, "turn processing failed");
                            println!("Error: {e}. Let's keep going.");
                        }
                    }
                }
            }
        }

        println!("{GOODBYE}");
        Ok(())
    }
}
