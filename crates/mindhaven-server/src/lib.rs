//! MindHaven Server
//!
//! HTTP service that triages chat messages into mental-state categories and
//! composes supportive replies. One synchronous endpoint (`POST /chat`)
//! drives the pipeline: crisis keyword gate, ML state classification,
//! session-keyed conversation memory, and chat-completion reply generation.

pub mod cli;
pub mod config;
pub mod orchestrator;
pub mod routes;
pub mod state;

pub use cli::Cli;
pub use config::ServerConfig;
pub use orchestrator::ChatOutcome;
pub use routes::{create_router, ChatRequest, ChatResponse};
pub use state::AppState;
