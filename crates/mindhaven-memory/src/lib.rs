//! MindHaven Memory
//!
//! In-process conversation memory, keyed by session id. Each session owns an
//! append-only log of turns in insertion order; the log defines prompt order
//! for the generative model.
//!
//! Locking discipline: the turn log uses a short synchronous mutex that is
//! never held across an await point. Callers snapshot the history *before*
//! any external model call and append *after* it returns, so slow I/O runs
//! unlocked. Requests for the same session are serialized with a separate
//! async guard; requests for different sessions never contend.

pub mod store;

pub use store::{ConversationStore, Session};
