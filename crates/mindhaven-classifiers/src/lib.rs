//! MindHaven Classifiers
//!
//! The two gates a message passes through before a reply is composed:
//! - `CrisisDetector`: keyword substring matching, always evaluated first
//! - `StateClassifier`: ML classification over five mental-state categories
//!
//! The crisis gate is pure and infallible at request time; the state
//! classifier wraps a Candle model loaded once at startup.

pub mod bert;
pub mod classifier;
pub mod crisis;

pub use bert::BertStateClassifier;
pub use classifier::{ClassificationResult, StateClassifier};
pub use crisis::CrisisDetector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bert::BertStateClassifier;
    pub use crate::classifier::{ClassificationResult, StateClassifier};
    pub use crate::crisis::CrisisDetector;
}
