//! Per-request triage pipeline
//!
//! One request walks: validation → crisis gate → classification → memory
//! append (user) → generation → memory append (assistant). The crisis gate
//! short-circuits everything after it and never touches memory.

use crate::state::AppState;
use mindhaven_core::{MentalState, Result, Turn};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Confidence reported on the crisis path, already scaled to [0, 100]
const CRISIS_CONFIDENCE: f64 = 99.0;

/// Outcome of one triaged message
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    /// Assigned mental-state category
    pub state: MentalState,

    /// Confidence in [0, 100], rounded to 2 decimals
    pub confidence: f64,

    /// Reply text returned to the caller
    pub reply: String,

    /// Whether the crisis override fired
    pub crisis: bool,

    /// Whether the generator fell back to the fixed reply
    pub used_fallback: bool,
}

/// Run the full pipeline for one message
pub async fn handle_message(
    state: &AppState,
    session_id: &str,
    message: &str,
) -> Result<ChatOutcome> {
    validate(state, message)?;

    // Crisis gate runs first, on the raw message, and wins over any
    // downstream error: no classification, no memory mutation, no
    // external call on this path.
    if let Some(keyword) = state.crisis.find(message) {
        warn!("Crisis keyword matched ({:?}), returning hotline response", keyword);
        metrics::counter!("mindhaven_crisis_total").increment(1);

        return Ok(ChatOutcome {
            state: MentalState::Crisis,
            confidence: CRISIS_CONFIDENCE,
            reply: state.config.crisis_reply.clone(),
            crisis: true,
            used_fallback: false,
        });
    }

    // Classification failure is a per-request error, never silently
    // defaulted to a label: a wrong label changes safety-relevant prompt
    // content.
    let start = Instant::now();
    let classification = state.classifier.classify(message).await.map_err(|e| {
        metrics::counter!("mindhaven_errors_total", "kind" => "classifier").increment(1);
        e
    })?;
    metrics::histogram!("mindhaven_stage_latency_us", "stage" => "classify")
        .record(start.elapsed().as_micros() as f64);

    debug!(
        "Classified as {} ({:.3}) in {}us",
        classification.state, classification.confidence, classification.latency_us
    );

    let session = state.memory.session(session_id);
    // Serialize same-session requests across the whole pipeline. The turn
    // log itself is locked only inside append/snapshot, so the generative
    // call below runs without holding any memory lock.
    let _guard = session.request_guard().await;

    let history = session.snapshot();
    session.append(Turn::user(message));

    let start = Instant::now();
    let reply = state
        .generator
        .generate(message, classification.state, &history)
        .await;
    metrics::histogram!("mindhaven_stage_latency_us", "stage" => "generate")
        .record(start.elapsed().as_micros() as f64);

    if reply.used_fallback {
        metrics::counter!("mindhaven_fallback_total").increment(1);
    }

    session.append(Turn::assistant(reply.text.clone()));

    info!(
        "Triage complete: session={} state={} turns={}",
        session.id(),
        classification.state,
        session.turn_count()
    );

    Ok(ChatOutcome {
        state: classification.state,
        confidence: round_confidence(classification.confidence),
        reply: reply.text,
        crisis: false,
        used_fallback: reply.used_fallback,
    })
}

/// Enforce the minimum request contract before any model is consulted
fn validate(state: &AppState, message: &str) -> Result<()> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(mindhaven_core::Error::validation(
            "message must not be empty",
        ));
    }

    if trimmed.chars().count() > state.config.max_message_chars {
        return Err(mindhaven_core::Error::validation(format!(
            "message exceeds {} characters",
            state.config.max_message_chars
        )));
    }

    Ok(())
}

/// Scale an argmax probability to [0, 100], rounded to 2 decimals
fn round_confidence(confidence: f32) -> f64 {
    (confidence as f64 * 100.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_rounds_to_two_decimals() {
        assert_eq!(round_confidence(0.87), 87.0);
        assert_eq!(round_confidence(0.87654), 87.65);
        assert_eq!(round_confidence(0.0), 0.0);
        assert_eq!(round_confidence(1.0), 100.0);
    }
}
