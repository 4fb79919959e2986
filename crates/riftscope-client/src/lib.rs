//! Client-side streaming session consumer for the Riftscope gateway.
//!
//! `session` is the pure state machine that folds stream events into a
//! transcript; `consumer` drives it from a live SSE subscription and
//! enforces the at-most-one-open-session rule.

pub mod consumer;
pub mod session;

pub use consumer::{AgentClient, SessionHandle};
pub use session::{Applied, Phase, Session, SessionView, TranscriptEntry};
