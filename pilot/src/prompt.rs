//! Proceed/cancel prompts and user-visible notifications

use async_trait::async_trait;
use colored::Colorize;
use tracing::warn;

/// A summary message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

/// Surface for confirmations and notifications, as a trait for testability
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask the user whether to proceed; `false` means cancel
    async fn confirm(&self, message: &str) -> bool;

    fn notify(&self, notice: Notice);
}

/// Prompter backed by the terminal
#[derive(Debug, Clone, Default)]
pub struct TerminalPrompter {
    /// Answer every confirmation with "proceed"
    pub assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            eprintln!("{} {}", message.yellow(), "(proceeding: --yes)".dimmed());
            return true;
        }

        let prompt = message.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(proceed)) => proceed,
            Ok(Err(e)) => {
                warn!("Confirmation prompt failed, treating as cancel: {}", e);
                false
            }
            Err(e) => {
                warn!("Confirmation task failed, treating as cancel: {}", e);
                false
            }
        }
    }

    fn notify(&self, notice: Notice) {
        match &notice {
            Notice::Info(m) => eprintln!("{} {}", "✔".green().bold(), m),
            Notice::Warning(m) => eprintln!("{} {}", "⚠".yellow().bold(), m.yellow()),
            Notice::Error(m) => eprintln!("{} {}", "✘".red().bold(), m.red()),
        }
    }
}
