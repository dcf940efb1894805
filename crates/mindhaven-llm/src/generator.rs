//! Reply generation from the classified state and conversation history

use crate::client::ChatClient;
use crate::prompt::SupportPrompt;
use mindhaven_core::{MentalState, Turn};
use std::sync::Arc;
use tracing::warn;

/// Reply returned when the model produces empty content, fails, or times out
pub const FALLBACK_REPLY: &str = "I'm here for you.";

/// A composed reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Text to return and record as the assistant turn
    pub text: String,

    /// Whether the fallback was used instead of model output
    pub used_fallback: bool,
}

/// Composes the prompt and invokes the generative backend
///
/// Reads a history snapshot only; the orchestrator owns both the user and
/// assistant appends to conversation memory.
pub struct ReplyGenerator {
    client: Arc<dyn ChatClient>,
    prompt: SupportPrompt,
    max_history_turns: usize,
}

impl ReplyGenerator {
    /// Create a new generator
    ///
    /// `max_history_turns` caps the prompt window: only that many of the
    /// most recent turns are sent to the model. The stored history itself
    /// is never truncated.
    pub fn new(client: Arc<dyn ChatClient>, prompt: SupportPrompt, max_history_turns: usize) -> Self {
        Self {
            client,
            prompt,
            max_history_turns,
        }
    }

    /// Generate a supportive reply
    ///
    /// Failures of the generative call are recoverable by design: the
    /// fallback text is returned and the error is logged, never surfaced to
    /// the caller as a request failure.
    pub async fn generate(&self, user_text: &str, state: MentalState, history: &[Turn]) -> Reply {
        let turns = self.build_turns(user_text, state, history);

        match self.client.complete(&turns).await {
            Ok(text) if text.trim().is_empty() => {
                warn!("Generative model returned empty content, using fallback reply");
                Reply {
                    text: FALLBACK_REPLY.to_string(),
                    used_fallback: true,
                }
            }
            Ok(text) => Reply {
                text,
                used_fallback: false,
            },
            Err(e) => {
                warn!("Generative call failed ({}), using fallback reply", e);
                Reply {
                    text: FALLBACK_REPLY.to_string(),
                    used_fallback: true,
                }
            }
        }
    }

    /// Assemble system instruction + history window + new user turn
    fn build_turns(&self, user_text: &str, state: MentalState, history: &[Turn]) -> Vec<Turn> {
        let window_start = history.len().saturating_sub(self.max_history_turns);
        let window = &history[window_start..];

        let mut turns = Vec::with_capacity(window.len() + 2);
        turns.push(Turn::system(self.prompt.render(state)));
        turns.extend_from_slice(window);
        turns.push(Turn::user(user_text));
        turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mindhaven_core::{Result, Role};

    struct FixedClient(String);

    #[async_trait]
    impl ChatClient for FixedClient {
        async fn complete(&self, _turns: &[Turn]) -> Result<String> {
            Ok(self.0.clone())
        }

        fn model(&self) -> &str {
            "fixed"
        }
    }

    struct FailingClient;

    #[async_trait]
    impl ChatClient for FailingClient {
        async fn complete(&self, _turns: &[Turn]) -> Result<String> {
            Err(mindhaven_core::Error::Timeout)
        }

        fn model(&self) -> &str {
            "failing"
        }
    }

    fn generator(client: Arc<dyn ChatClient>) -> ReplyGenerator {
        ReplyGenerator::new(client, SupportPrompt::default(), 40)
    }

    #[tokio::test]
    async fn returns_model_text() {
        let generator = generator(Arc::new(FixedClient("That sounds hard.".to_string())));
        let reply = generator
            .generate("rough day", MentalState::Stress, &[])
            .await;
        assert_eq!(reply.text, "That sounds hard.");
        assert!(!reply.used_fallback);
    }

    #[tokio::test]
    async fn empty_content_yields_exact_fallback() {
        let generator = generator(Arc::new(FixedClient(String::new())));
        let reply = generator.generate("hello", MentalState::Normal, &[]).await;
        assert_eq!(reply.text, FALLBACK_REPLY);
        assert!(reply.used_fallback);
    }

    #[tokio::test]
    async fn client_failure_yields_exact_fallback() {
        let generator = generator(Arc::new(FailingClient));
        let reply = generator.generate("hello", MentalState::Normal, &[]).await;
        assert_eq!(reply.text, FALLBACK_REPLY);
        assert!(reply.used_fallback);
    }

    #[test]
    fn prompt_order_is_system_history_user() {
        let generator = generator(Arc::new(FixedClient(String::new())));
        let history = vec![Turn::user("earlier"), Turn::assistant("I hear you")];
        let turns = generator.build_turns("today", MentalState::Depression, &history);

        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, Role::System);
        assert!(turns[0].content.contains("Depression"));
        assert_eq!(turns[1].content, "earlier");
        assert_eq!(turns[2].content, "I hear you");
        assert_eq!(turns[3], Turn::user("today"));
    }

    #[test]
    fn history_window_keeps_most_recent_turns() {
        let generator = ReplyGenerator::new(
            Arc::new(FixedClient(String::new())),
            SupportPrompt::default(),
            2,
        );
        let history: Vec<Turn> = (0..6).map(|i| Turn::user(format!("turn {i}"))).collect();
        let turns = generator.build_turns("now", MentalState::Neutral, &history);

        // system + 2 most recent history turns + new user turn
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[1].content, "turn 4");
        assert_eq!(turns[2].content, "turn 5");
    }
}
