//! Application state shared across requests

use crate::config::ServerConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use mindhaven_classifiers::{CrisisDetector, StateClassifier};
use mindhaven_core::Result;
use mindhaven_llm::{ChatClient, ReplyGenerator, SupportPrompt};
use mindhaven_memory::ConversationStore;
use std::sync::Arc;
use tracing::info;

/// Application state shared across all requests
///
/// Every expensive resource is constructed exactly once here and injected
/// into the pipeline; the classifier and chat client are trait objects so
/// tests can substitute doubles.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Crisis keyword gate
    pub crisis: Arc<CrisisDetector>,

    /// Mental-state classifier
    pub classifier: Arc<dyn StateClassifier>,

    /// Reply generator over the chat-completion backend
    pub generator: Arc<ReplyGenerator>,

    /// Session-keyed conversation memory
    pub memory: Arc<ConversationStore>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    /// Assemble application state from its injected components
    ///
    /// Construction is fallible; a failure here means the service refuses
    /// to become ready.
    pub fn new(
        config: ServerConfig,
        classifier: Arc<dyn StateClassifier>,
        chat_client: Arc<dyn ChatClient>,
        metrics_handle: PrometheusHandle,
    ) -> Result<Self> {
        info!("Initializing application state");

        let crisis = CrisisDetector::new()?;

        let prompt = match &config.prompt_template {
            Some(template) => SupportPrompt::new(template.clone())?,
            None => SupportPrompt::default(),
        };

        let generator = ReplyGenerator::new(chat_client, prompt, config.max_history_turns);

        info!("Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            crisis: Arc::new(crisis),
            classifier,
            generator: Arc::new(generator),
            memory: Arc::new(ConversationStore::new()),
            metrics_handle,
        })
    }
}
