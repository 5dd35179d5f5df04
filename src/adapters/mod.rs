//! Terminal-side adapters: the CLI's notifier and grant prompts.

mod notifier;
mod prompt;

pub use notifier::ConsoleNotifier;
pub use prompt::{FixedDecisionPrompt, StdinPrompt};
