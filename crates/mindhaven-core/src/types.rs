//! Core types for MindHaven

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of the sender of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Wire representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single turn in a conversation
///
/// Turns are immutable once created; conversation state only ever grows by
/// appending new turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Role of the turn's author (system, user, assistant)
    pub role: Role,

    /// Content of the turn
    pub content: String,
}

impl Turn {
    /// Create a new turn
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a system turn
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Mental-state category assigned to a message
///
/// Variant order matches the output head of the classification model:
/// index 0 is `Crisis`, index 4 is `Stress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MentalState {
    Crisis,
    Depression,
    Neutral,
    Normal,
    Stress,
}

impl MentalState {
    /// All categories, in model output order
    pub const ALL: [MentalState; 5] = [
        Self::Crisis,
        Self::Depression,
        Self::Neutral,
        Self::Normal,
        Self::Stress,
    ];

    /// Human-readable label, as returned to API callers
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crisis => "Crisis",
            Self::Depression => "Depression",
            Self::Neutral => "Neutral",
            Self::Normal => "Normal",
            Self::Stress => "Stress",
        }
    }

    /// Map a model output index to its category
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for MentalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MentalState {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|state| state.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::Error::internal(format!("unknown mental state: {s}")))
    }
}
