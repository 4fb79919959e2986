//! Streaming session state machine.
//!
//! Folds the gateway's event stream into a growing transcript plus an
//! in-progress status line. Pure state: the network driver lives in
//! `consumer`, which feeds decoded events in arrival order.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use riftscope_protocol::StreamEvent;

/// Lifecycle of one streaming session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Active,
    Finished,
    Failed,
}

/// One finalized conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl TranscriptEntry {
    fn new(content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            created_at: Utc::now(),
        }
    }
}

/// Result of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Session stays open.
    Continue,
    /// Session reached a terminal state; the subscription must be
    /// released.
    Closed,
}

/// Renderable snapshot of a session, published after every fold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub phase: Phase,
    pub live_status: String,
    pub transcript: Vec<TranscriptEntry>,
}

/// The session state machine.
///
/// `Idle -> Active -> {Finished | Failed}`. The transcript survives
/// across sessions; buffer and status are per-session.
#[derive(Debug, Clone)]
pub struct Session {
    transcript: Vec<TranscriptEntry>,
    live_status: String,
    buffer: String,
    phase: Phase,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            transcript: Vec::new(),
            live_status: String::new(),
            buffer: String::new(),
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn live_status(&self) -> &str {
        &self.live_status
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            live_status: self.live_status.clone(),
            transcript: self.transcript.clone(),
        }
    }

    /// Open a new session. Buffer and status reset; the transcript
    /// keeps earlier turns.
    pub fn begin(&mut self) {
        self.buffer.clear();
        self.live_status.clear();
        self.phase = Phase::Active;
    }

    /// Fold one event into the session.
    ///
    /// Events arriving outside `Active` are ignored: the subscription
    /// is already closed by the time a second terminal frame could
    /// show up.
    pub fn apply(&mut self, event: &StreamEvent) -> Applied {
        if self.phase != Phase::Active {
            return Applied::Closed;
        }

        match event {
            StreamEvent::Thinking { content } => {
                self.set_status(content.as_deref(), "Thinking...");
            }
            StreamEvent::Routing { content } => {
                self.set_status(content.as_deref(), "Routing request...");
            }
            StreamEvent::Planning { content } => {
                self.set_status(content.as_deref(), "Planning analysis...");
            }
            StreamEvent::Executing { content } => {
                self.set_status(content.as_deref(), "Running analysis...");
            }
            StreamEvent::ThinkingStart { content } => {
                self.set_status(content.as_deref(), "Thinking...");
            }
            StreamEvent::ThinkingEnd { content } => {
                self.set_status(content.as_deref(), "Finished thinking");
            }
            StreamEvent::RoutingStart { query } => {
                self.live_status = format!("Analyzing request: {query}");
            }
            StreamEvent::RoutingMethod { method, confidence } => {
                self.live_status = match confidence {
                    Some(confidence) => {
                        format!("Routing via {method} ({:.0}% confidence)", confidence * 100.0)
                    }
                    None => format!("Routing via {method}"),
                };
            }
            StreamEvent::RoutingDecision { subagent } => {
                self.live_status = match subagent {
                    Some(subagent) => format!("Delegating to {subagent}"),
                    None => "Handling directly".to_string(),
                };
            }
            StreamEvent::AgentStart { agent } => {
                self.live_status = format!("{agent} started");
            }
            // The one status-class event that accumulates instead of
            // overwriting.
            StreamEvent::Progress { content } => {
                if !self.live_status.is_empty() {
                    self.live_status.push('\n');
                }
                self.live_status.push_str(content);
            }
            // Two historical names, one behavior: grow the response
            // and mirror it into the status for the typing effect.
            StreamEvent::Report { content } | StreamEvent::Chunk { content } => {
                self.buffer.push_str(content);
                self.live_status = self.buffer.clone();
            }
            StreamEvent::Complete { detailed } => {
                // A server-declared final text wins over whatever was
                // accumulated chunk by chunk.
                if let Some(detailed) = detailed {
                    self.buffer = detailed.clone();
                    self.live_status = self.buffer.clone();
                }
            }
            StreamEvent::Done => {
                let content = if self.buffer.is_empty() {
                    std::mem::take(&mut self.live_status)
                } else {
                    std::mem::take(&mut self.buffer)
                };
                self.transcript.push(TranscriptEntry::new(content));
                self.live_status.clear();
                self.buffer.clear();
                self.phase = Phase::Finished;
                return Applied::Closed;
            }
            StreamEvent::Error { .. } => {
                let message = event
                    .error_message()
                    .unwrap_or("analysis failed")
                    .to_string();
                return self.fail(&message);
            }
            StreamEvent::Unknown => {
                tracing::debug!("Ignoring unknown stream event type");
            }
        }

        Applied::Continue
    }

    /// Transport-level failure of the subscription itself; treated
    /// exactly like an `error` frame.
    pub fn fail(&mut self, message: &str) -> Applied {
        self.live_status = format!("Error: {message}");
        self.buffer.clear();
        self.phase = Phase::Failed;
        Applied::Closed
    }

    /// Explicit cancellation: nothing terminal was observed, so the
    /// session returns to idle without a transcript entry.
    pub fn cancel(&mut self) {
        if self.phase == Phase::Active {
            self.live_status.clear();
            self.buffer.clear();
            self.phase = Phase::Idle;
        }
    }

    fn set_status(&mut self, content: Option<&str>, fallback: &str) {
        self.live_status = content.unwrap_or(fallback).to_string();
    }
}
