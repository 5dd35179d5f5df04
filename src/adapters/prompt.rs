//! Grant prompts for the terminal.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use hb_core::grant::{GrantPrompt, UserDecision};
use hb_core::ports::GrantPromptPort;

/// Answers every prompt with a decision fixed up front (`--auto` / `--manual`).
pub struct FixedDecisionPrompt(pub UserDecision);

#[async_trait]
impl GrantPromptPort for FixedDecisionPrompt {
    async fn choose(&self, _prompt: &GrantPrompt) -> UserDecision {
        self.0
    }
}

/// Asks on stderr and reads one line from stdin.
pub struct StdinPrompt;

#[async_trait]
impl GrantPromptPort for StdinPrompt {
    async fn choose(&self, prompt: &GrantPrompt) -> UserDecision {
        eprintln!("Permission {} is not granted.", prompt.permission);
        eprintln!("To grant it by hand, run: {}", prompt.manual_command);
        eprint!(
            "Grant automatically through the helper? \
             [a]uto / [m]anual / anything else cancels: "
        );

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        match reader.read_line(&mut line).await {
            Ok(_) => parse_decision(&line),
            Err(err) => {
                warn!(error = %err, "failed to read grant decision");
                UserDecision::Cancel
            }
        }
    }
}

fn parse_decision(input: &str) -> UserDecision {
    match input.trim().to_ascii_lowercase().as_str() {
        "a" | "auto" | "automatic" => UserDecision::Automatic,
        "m" | "manual" => UserDecision::Manual,
        _ => UserDecision::Cancel,
    }
}
