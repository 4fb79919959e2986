//! SSE subscription driver.
//!
//! Owns the single live subscription to the gateway and feeds decoded
//! frames to the session state machine in arrival order. Starting a
//! new session always cancels the previous one first; cleanup is an
//! explicit cancellation token, never implicit drop timing.

use futures::StreamExt;
use reqwest_eventsource::{Event as SseEvent, EventSource};
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use riftscope_protocol::StreamEvent;

use crate::session::{Applied, Phase, Session, SessionView};

/// Client for the gateway's agent-invoke endpoint.
///
/// Holds at most one open subscription. `start` on a busy client
/// closes the prior session's subscription before opening the new one.
pub struct AgentClient {
    http: reqwest::Client,
    base_url: String,
    active: Option<CancellationToken>,
}

impl AgentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            active: None,
        }
    }

    /// Open a streaming session for one agent invocation.
    pub fn start(&mut self, agent: &str, payload: Value) -> SessionHandle {
        // At-most-one-open-session: actively cancel the previous
        // subscription rather than waiting for it to be collected.
        if let Some(previous) = self.active.take() {
            debug!("Closing previous session before starting a new one");
            previous.cancel();
        }

        let cancel = CancellationToken::new();
        self.active = Some(cancel.clone());

        let url = format!(
            "{}/api/agents/{}/invoke",
            self.base_url.trim_end_matches('/'),
            agent
        );
        let request = self.http.post(url).json(&payload);

        let mut session = Session::new();
        session.begin();
        let (tx, updates) = watch::channel(session.view());

        let task = tokio::spawn(run_session(request, session, tx, cancel.clone()));

        SessionHandle {
            cancel,
            updates,
            task,
        }
    }

    /// Close the active session, if any.
    pub fn close(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel();
        }
    }
}

impl Drop for AgentClient {
    fn drop(&mut self) {
        self.close();
    }
}

/// Handle to one streaming session.
pub struct SessionHandle {
    cancel: CancellationToken,
    updates: watch::Receiver<SessionView>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Snapshot receiver; a new value is published after every folded
    /// event.
    pub fn updates(&self) -> watch::Receiver<SessionView> {
        self.updates.clone()
    }

    /// Cancel the subscription.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// Whether the driver task has ended (terminal frame, transport
    /// failure, or cancellation).
    pub fn is_closed(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the session to end and return the final view.
    pub async fn wait(self) -> SessionView {
        let join = self.task.await;
        let mut view = self.updates.borrow().clone();
        if let Err(err) = join {
            // A panicked driver never published a terminal snapshot;
            // report the failure instead of a stale Active view.
            warn!(error = %err, "Session driver task did not complete");
            if view.phase == Phase::Active {
                view.phase = Phase::Failed;
                view.live_status = format!("Error: session driver failed: {err}");
            }
        }
        view
    }
}

async fn run_session(
    request: reqwest::RequestBuilder,
    mut session: Session,
    tx: watch::Sender<SessionView>,
    cancel: CancellationToken,
) {
    let mut es = match EventSource::new(request) {
        Ok(es) => es,
        Err(err) => {
            session.fail(&format!("failed to open stream: {err}"));
            let _ = tx.send(session.view());
            return;
        }
    };

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                es.close();
                session.cancel();
                let _ = tx.send(session.view());
                return;
            }
            event = es.next() => event,
        };

        match event {
            Some(Ok(SseEvent::Open)) => {}
            Some(Ok(SseEvent::Message(message))) => {
                let decoded: Result<StreamEvent, _> = serde_json::from_str(&message.data);
                match decoded {
                    Ok(stream_event) => {
                        let applied = session.apply(&stream_event);
                        let _ = tx.send(session.view());
                        if applied == Applied::Closed {
                            es.close();
                            return;
                        }
                    }
                    Err(err) => {
                        // One corrupt frame must not abort an
                        // otherwise-healthy stream.
                        warn!(error = %err, data = %message.data, "Skipping malformed stream event");
                    }
                }
            }
            Some(Err(err)) => {
                // Transport-level failure of the subscription itself;
                // same transition as an error frame. Closing also
                // stops reqwest-eventsource from reconnecting.
                es.close();
                session.fail(&format!("stream error: {err}"));
                let _ = tx.send(session.view());
                return;
            }
            None => {
                es.close();
                if session.is_active() {
                    session.fail("stream ended unexpectedly");
                    let _ = tx.send(session.view());
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wait_reports_a_crashed_driver_as_failed() {
        let mut session = Session::new();
        session.begin();
        let (_tx, updates) = watch::channel(session.view());

        let handle = SessionHandle {
            cancel: CancellationToken::new(),
            updates,
            task: tokio::spawn(async { panic!("driver crashed") }),
        };

        let view = handle.wait().await;
        assert_eq!(view.phase, Phase::Failed);
        assert!(view.live_status.starts_with("Error:"));
    }
}
