//! System prompt template for the support assistant
//!
//! The safety rules live in data, not control flow, so they can be tested
//! and overridden without touching the generative call.

use mindhaven_core::{MentalState, Result};

/// Placeholder replaced by the classified mental-state label
const STATE_PLACEHOLDER: &str = "{state}";

/// Default system instruction with the fixed safety rules
const DEFAULT_TEMPLATE: &str = "\
You are a calm, empathetic mental-health support assistant.

Rules:
- Do NOT give medical advice
- Do NOT suggest medication
- Do NOT panic unless user shows real suicidal intent
- Be supportive and short
- Ask gentle follow-up questions
User mental state: {state}
";

/// System-prompt template parameterized by the classified label
#[derive(Debug, Clone)]
pub struct SupportPrompt {
    template: String,
}

impl SupportPrompt {
    /// Create a prompt from a custom template
    ///
    /// The template must contain the `{state}` placeholder.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(STATE_PLACEHOLDER) {
            return Err(mindhaven_core::Error::config(format!(
                "prompt template is missing the {STATE_PLACEHOLDER} placeholder"
            )));
        }
        Ok(Self { template })
    }

    /// Render the system instruction for the given mental state
    pub fn render(&self, state: MentalState) -> String {
        self.template.replace(STATE_PLACEHOLDER, state.as_str())
    }
}

impl Default for SupportPrompt {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}
