//! Canonical wire types for Riftscope agent streaming.
//!
//! These types define the contract between the analysis backend, the
//! gateway, and the frontend stream consumer. The gateway relays
//! event-stream bodies verbatim, so both ends must agree on exactly
//! this vocabulary.

mod envelope;
mod events;

pub use envelope::AnalysisEnvelope;
pub use events::StreamEvent;
