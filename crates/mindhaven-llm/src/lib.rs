//! MindHaven LLM
//!
//! Reply composition for the triage pipeline:
//! - `ChatClient`: seam over the generative chat-completion backend
//! - `HfRouterClient`: OpenAI-compatible HTTP client for the HF router
//! - `SupportPrompt`: declarative system-prompt template with safety rules
//! - `ReplyGenerator`: prompt assembly, bounded history window, fallback

pub mod client;
pub mod generator;
pub mod prompt;

pub use client::{ChatClient, HfRouterClient};
pub use generator::{Reply, ReplyGenerator, FALLBACK_REPLY};
pub use prompt::SupportPrompt;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::{ChatClient, HfRouterClient};
    pub use crate::generator::{Reply, ReplyGenerator, FALLBACK_REPLY};
    pub use crate::prompt::SupportPrompt;
}
