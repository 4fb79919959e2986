//! Stream event vocabulary.
//!
//! The analysis backend emits one JSON object per SSE frame, tagged by
//! `type`. Tags fall into a few families: status-only updates, routing
//! telemetry, incremental progress, content delivery, and terminal
//! frames. `report` and `chunk` are two historical names for the same
//! append-to-buffer behavior and both remain accepted.

use serde::{Deserialize, Serialize};

/// One decoded frame of an agent event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Agent is reasoning about the request.
    Thinking { content: Option<String> },
    /// Agent is choosing how to route the request.
    Routing { content: Option<String> },
    /// Agent is drafting an execution plan.
    Planning { content: Option<String> },
    /// Agent is executing the plan.
    Executing { content: Option<String> },
    /// Extended reasoning block opened.
    ThinkingStart { content: Option<String> },
    /// Extended reasoning block closed.
    ThinkingEnd { content: Option<String> },
    /// Router began classifying the user query.
    RoutingStart { query: String },
    /// Router picked a classification method.
    RoutingMethod {
        method: String,
        confidence: Option<f64>,
    },
    /// Router settled on a subagent (or decided to handle it directly).
    RoutingDecision { subagent: Option<String> },
    /// A subagent began producing the analysis.
    AgentStart { agent: String },
    /// Cumulative progress line. Unlike the status-only tags this
    /// appends rather than overwrites.
    Progress { content: String },
    /// Analysis text fragment, appended to the running response.
    Report { content: String },
    /// Analysis text fragment, appended to the running response.
    Chunk { content: String },
    /// Generation finished. When `detailed` is present it is the
    /// authoritative final text and replaces everything accumulated.
    Complete { detailed: Option<String> },
    /// Terminal frame: freeze the accumulated response.
    Done,
    /// Terminal failure frame. Older backends use `content`, newer
    /// ones `error`.
    Error {
        content: Option<String>,
        error: Option<String>,
    },
    /// Unknown event type (forward-compatible).
    #[serde(other)]
    Unknown,
}

impl StreamEvent {
    /// Whether this frame ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error { .. })
    }

    /// The failure message carried by an `error` frame.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { content, error } => {
                content.as_deref().or(error.as_deref())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_status_tags() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"thinking","content":"Reading match data"}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Thinking {
                content: Some("Reading match data".to_string())
            }
        );

        let event: StreamEvent = serde_json::from_str(r#"{"type":"thinking_start"}"#).unwrap();
        assert_eq!(event, StreamEvent::ThinkingStart { content: None });
    }

    #[test]
    fn decodes_routing_telemetry() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"routing_start","query":"how was my season?"}"#)
                .unwrap();
        assert_eq!(
            event,
            StreamEvent::RoutingStart {
                query: "how was my season?".to_string()
            }
        );

        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"routing_method","method":"llm","confidence":0.92}"#)
                .unwrap();
        assert_eq!(
            event,
            StreamEvent::RoutingMethod {
                method: "llm".to_string(),
                confidence: Some(0.92)
            }
        );

        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"routing_decision","subagent":null}"#).unwrap();
        assert_eq!(event, StreamEvent::RoutingDecision { subagent: None });
    }

    #[test]
    fn decodes_content_and_terminal_tags() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"chunk","content":"Hello "}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Chunk {
                content: "Hello ".to_string()
            }
        );
        assert!(!event.is_terminal());

        let event: StreamEvent = serde_json::from_str(r#"{"type":"done"}"#).unwrap();
        assert_eq!(event, StreamEvent::Done);
        assert!(event.is_terminal());
    }

    #[test]
    fn report_is_the_legacy_name_for_chunk() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"report","content":"Hello "}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Report {
                content: "Hello ".to_string()
            }
        );
        assert!(!event.is_terminal());
    }

    #[test]
    fn error_message_prefers_content() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"error","content":"backend exploded"}"#).unwrap();
        assert_eq!(event.error_message(), Some("backend exploded"));

        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"error","error":"backend exploded"}"#).unwrap();
        assert_eq!(event.error_message(), Some("backend exploded"));
        assert!(event.is_terminal());
    }

    #[test]
    fn unknown_tag_is_recovered() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"telemetry_v2","payload":{"x":1}}"#).unwrap();
        assert_eq!(event, StreamEvent::Unknown);
    }

    #[test]
    fn round_trips_complete() {
        let event = StreamEvent::Complete {
            detailed: Some("final text".to_string()),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: StreamEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
