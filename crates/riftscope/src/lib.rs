//! Riftscope gateway library.
//!
//! Sits between the frontend and the external analysis backend.
//! Resolves a logical agent identifier to a backend route, invokes the
//! backend under that route's timeout budget, and either relays an
//! event-stream body verbatim or reframes a buffered JSON reply.

pub mod agents;
pub mod api;
pub mod config;
