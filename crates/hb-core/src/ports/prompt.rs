use async_trait::async_trait;

use crate::grant::{GrantPrompt, UserDecision};

/// Asks the user how a missing permission should be resolved.
#[async_trait]
pub trait GrantPromptPort: Send + Sync {
    async fn choose(&self, prompt: &GrantPrompt) -> UserDecision;
}
