//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Server configuration
///
/// Loaded from a YAML file with CLI overrides; every field has a default so
/// the service can start from an empty configuration. The access token for
/// the model-hosting provider is deliberately *not* part of this file; it
/// comes from the `HF_TOKEN` environment variable only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the OpenAI-compatible inference router
    #[serde(default = "default_router_url")]
    pub router_url: String,

    /// Classification-model repository on the Hugging Face Hub
    #[serde(default = "default_classifier_model")]
    pub classifier_model: String,

    /// Generative chat-model identifier
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Inference device for the classifier ("cpu", "cuda", "mps")
    #[serde(default = "default_device")]
    pub device: String,

    /// Sampling temperature for reply generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Output length bound for reply generation, in tokens
    #[serde(default = "default_max_reply_tokens")]
    pub max_reply_tokens: u32,

    /// Timeout for one generative call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Most-recent turns included in the generation prompt window
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,

    /// Upper bound on accepted message length, in characters
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Fixed response returned on the crisis path
    #[serde(default = "default_crisis_reply")]
    pub crisis_reply: String,

    /// Optional override for the system-prompt template
    ///
    /// Must contain the `{state}` placeholder when set.
    #[serde(default)]
    pub prompt_template: Option<String>,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &crate::Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config: Self = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(router) = &cli.router {
            config.router_url = router.clone();
        }

        if let Some(chat_model) = &cli.chat_model {
            config.chat_model = chat_model.clone();
        }

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            router_url: default_router_url(),
            classifier_model: default_classifier_model(),
            chat_model: default_chat_model(),
            device: default_device(),
            temperature: default_temperature(),
            max_reply_tokens: default_max_reply_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            max_history_turns: default_max_history_turns(),
            max_message_chars: default_max_message_chars(),
            crisis_reply: default_crisis_reply(),
            prompt_template: None,
        }
    }
}

/// Read the provider access token from the environment
///
/// Absence is a fatal startup error; the service must not accept traffic
/// without it.
pub fn load_hf_token() -> mindhaven_core::Result<String> {
    std::env::var("HF_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| {
            mindhaven_core::Error::config("HF_TOKEN missing from environment".to_string())
        })
}

fn default_router_url() -> String {
    "https://router.huggingface.co/v1".to_string()
}

fn default_classifier_model() -> String {
    "YashKumar11/vitagita-model".to_string()
}

fn default_chat_model() -> String {
    "moonshotai/Kimi-K2-Instruct-0905".to_string()
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_temperature() -> f32 {
    0.6
}

fn default_max_reply_tokens() -> u32 {
    200
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_history_turns() -> usize {
    40
}

fn default_max_message_chars() -> usize {
    4000
}

fn default_crisis_reply() -> String {
    "🚨 I'm really sorry you're feeling this way.\n\n\
     Please reach out immediately:\n\
     📞 India Suicide Helpline: 9152987821\n\
     📞 AASRA: 91-9820466726\n\
     📞 Emergency: 112\n\n\
     You are not alone. Help is available."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_uses_defaults() {
        let config: ServerConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.temperature, 0.6);
        assert_eq!(config.max_reply_tokens, 200);
        assert_eq!(config.max_history_turns, 40);
        assert!(config.crisis_reply.contains("9152987821"));
    }

    #[test]
    fn load_reads_file_and_applies_cli_overrides() {
        use clap::Parser;
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"chat_model: file-model\nmax_history_turns: 12\n")
            .unwrap();

        let cli = crate::Cli::parse_from(["mindhaven-server", "--chat-model", "cli-model"]);
        let config = ServerConfig::load(file.path().to_str().unwrap(), &cli).unwrap();

        // CLI wins over the file; untouched fields come from the file.
        assert_eq!(config.chat_model, "cli-model");
        assert_eq!(config.max_history_turns, 12);
    }

    #[test]
    fn partial_yaml_overrides_selected_fields() {
        let yaml = "chat_model: some-org/some-model\nmax_history_turns: 10\n";
        let config: ServerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.chat_model, "some-org/some-model");
        assert_eq!(config.max_history_turns, 10);
        assert_eq!(config.router_url, "https://router.huggingface.co/v1");
    }
}
