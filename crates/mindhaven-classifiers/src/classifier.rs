//! StateClassifier trait and classification result types

use async_trait::async_trait;
use mindhaven_core::{MentalState, Result};

/// Trait for mental-state classifiers
///
/// The production implementation wraps an injected model-inference backend;
/// tests substitute doubles with fixed outputs.
#[async_trait]
pub trait StateClassifier: Send + Sync {
    /// Classify the given text into one of the five mental-state categories
    async fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Result of classification
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Argmax mental-state category
    pub state: MentalState,

    /// Probability of the argmax category (0.0-1.0)
    pub confidence: f32,

    /// Full probability distribution, in model output order
    pub scores: Vec<(MentalState, f32)>,

    /// Model name or version
    pub model: Option<String>,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    /// Create a new classification result from a probability distribution
    ///
    /// Picks the argmax category; `probs` must have one entry per category
    /// in model output order.
    pub fn from_probs(probs: &[f32]) -> Result<Self> {
        if probs.len() != MentalState::ALL.len() {
            return Err(mindhaven_core::Error::classifier(format!(
                "expected {} class probabilities, got {}",
                MentalState::ALL.len(),
                probs.len()
            )));
        }

        let (index, confidence) = probs
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or_else(|| mindhaven_core::Error::classifier("empty probability vector"))?;

        let state = MentalState::from_index(index)
            .ok_or_else(|| mindhaven_core::Error::classifier("argmax index out of range"))?;

        Ok(Self {
            state,
            confidence,
            scores: MentalState::ALL
                .iter()
                .copied()
                .zip(probs.iter().copied())
                .collect(),
            model: None,
            latency_us: 0,
        })
    }

    /// Attach the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Record the observed classification latency
    pub fn with_latency(mut self, latency_us: u64) -> Self {
        self.latency_us = latency_us;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_probs_picks_argmax() {
        let result = ClassificationResult::from_probs(&[0.05, 0.1, 0.05, 0.7, 0.1]).unwrap();
        assert_eq!(result.state, MentalState::Normal);
        assert!((result.confidence - 0.7).abs() < f32::EPSILON);
        assert_eq!(result.scores.len(), 5);
    }

    #[test]
    fn from_probs_rejects_wrong_cardinality() {
        assert!(ClassificationResult::from_probs(&[0.5, 0.5]).is_err());
    }
}
