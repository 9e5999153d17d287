//! The session client: one prompt in flight at a time.
//!
//! A submission walks `Idle → Pending → Idle`. While Pending, the USER turn
//! is already visible in the transcript; it is either answered by an
//! ASSISTANT turn or rolled back before the client returns to Idle.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, Semaphore, SemaphorePermit};

use pl_domain::config::{Config, GenerationConfig, SessionConfig};
use pl_domain::error::{Error, Result};
use pl_domain::trace::TraceEvent;
use pl_domain::turn::{Speaker, Turn};
use pl_providers::{GeminiEndpoint, RemoteEndpoint};
use pl_transcript::{TranscriptStore, TranscriptView};

use crate::request::build_request;

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The client entered (`true`) or left (`false`) the Pending state.
    Busy { busy: bool },
    /// A submission failed. `message` is suitable for showing to a user.
    Failed { kind: String, message: String },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SessionClient
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct SessionClient {
    session_id: String,
    store: Arc<TranscriptStore>,
    endpoint: Arc<dyn RemoteEndpoint>,
    session: SessionConfig,
    generation: GenerationConfig,
    /// Single permit. Held for the whole Pending state.
    flight: Semaphore,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionClient {
    /// Create a client over `endpoint`, seeding the greeting turn if one is
    /// configured.
    pub fn new(
        endpoint: Arc<dyn RemoteEndpoint>,
        session: SessionConfig,
        generation: GenerationConfig,
    ) -> Result<Self> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let store = match session.greeting.as_deref() {
            Some(greeting) => TranscriptStore::with_greeting(session_id.clone(), greeting)?,
            None => TranscriptStore::new(session_id.clone()),
        };
        let (events, _) = broadcast::channel(32);

        tracing::debug!(
            session_id = %session_id,
            endpoint = %endpoint.endpoint_id(),
            seeded = session.greeting.is_some(),
            "session created"
        );

        Ok(Self {
            session_id,
            store: Arc::new(store),
            endpoint,
            session,
            generation,
            flight: Semaphore::new(1),
            events,
        })
    }

    /// Build a client talking to the configured Gemini endpoint.
    pub fn from_config(config: &Config) -> Result<Self> {
        let endpoint = GeminiEndpoint::from_config(&config.provider)?;
        Self::new(
            Arc::new(endpoint),
            config.session.clone(),
            config.generation,
        )
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Read-only handle to the transcript, for readers that want to
    /// subscribe to its change events. The client stays the only writer.
    pub fn store(&self) -> TranscriptView {
        TranscriptView::new(Arc::clone(&self.store))
    }

    /// Snapshot of the transcript. Callable in any state.
    pub fn transcript(&self) -> Vec<Turn> {
        self.store.snapshot()
    }

    /// `true` while a submission is Pending.
    pub fn is_busy(&self) -> bool {
        self.flight.available_permits() == 0
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Submit one user message and wait for the assistant's reply.
    ///
    /// On success the transcript has grown by exactly two turns and the
    /// committed ASSISTANT turn is returned. On any failure the transcript
    /// is left as it was before the call.
    pub async fn submit(&self, text: &str) -> Result<Turn> {
        let result = self.try_submit(text).await;
        if let Err(e) = &result {
            self.report_failure(e);
        }
        result
    }

    async fn try_submit(&self, text: &str) -> Result<Turn> {
        if text.trim().is_empty() {
            return Err(Error::Validation("message must not be empty".into()));
        }

        let permit = self.flight.try_acquire().map_err(|_| Error::Busy)?;
        let _flight = InFlight::enter(permit, &self.events);

        let history = self.store.snapshot();
        let request = build_request(&history, text, &self.session, &self.generation);

        TraceEvent::RequestBuilt {
            session_id: self.session_id.clone(),
            turns: request.turns.len(),
            first_user_turn: !history.iter().any(Turn::is_user),
            system_instruction: request.system_instruction.is_some(),
        }
        .emit();

        let prompt = self.store.append(Speaker::User, text)?;
        let pending = PendingPrompt {
            store: &self.store,
            turn_id: prompt.id,
            committed: false,
        };

        let reply = match self
            .endpoint
            .generate(&request)
            .await
            .and_then(|resp| resp.first_text().map(str::to_owned))
        {
            Ok(text) => text,
            Err(Error::EmptyResponse) => {
                TraceEvent::FallbackSubstituted {
                    session_id: self.session_id.clone(),
                }
                .emit();
                self.session.fallback_text.clone()
            }
            Err(e) => return Err(e),
        };

        let answer = self.store.append(Speaker::Assistant, &reply)?;
        pending.commit();
        Ok(answer)
    }

    fn report_failure(&self, e: &Error) {
        tracing::warn!(
            session_id = %self.session_id,
            kind = e.kind(),
            error = %e,
            "submission failed"
        );

        TraceEvent::SubmissionFailed {
            session_id: self.session_id.clone(),
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
        .emit();

        let _ = self.events.send(SessionEvent::Failed {
            kind: e.kind().to_string(),
            message: e.to_string(),
        });
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Guards
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Holds the flight permit; announces Idle once it is released.
struct InFlight<'a> {
    permit: Option<SemaphorePermit<'a>>,
    events: &'a broadcast::Sender<SessionEvent>,
}

impl<'a> InFlight<'a> {
    fn enter(permit: SemaphorePermit<'a>, events: &'a broadcast::Sender<SessionEvent>) -> Self {
        let _ = events.send(SessionEvent::Busy { busy: true });
        Self {
            permit: Some(permit),
            events,
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        drop(self.permit.take());
        let _ = self.events.send(SessionEvent::Busy { busy: false });
    }
}

/// Rolls the USER turn back unless the reply was committed. Also covers
/// the submit future being dropped mid-flight.
struct PendingPrompt<'a> {
    store: &'a TranscriptStore,
    turn_id: u64,
    committed: bool,
}

impl PendingPrompt<'_> {
    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PendingPrompt<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match self.store.last() {
            Some(tail) if tail.id == self.turn_id => {
                if let Err(e) = self.store.rollback_last() {
                    tracing::error!(turn_id = self.turn_id, error = %e, "rollback failed");
                }
            }
            _ => tracing::error!(
                turn_id = self.turn_id,
                "pending prompt is no longer the transcript tail; not rolled back"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let busy = serde_json::to_value(SessionEvent::Busy { busy: true }).unwrap();
        assert_eq!(busy["type"], "busy");
        assert_eq!(busy["busy"], true);

        let failed = serde_json::to_value(SessionEvent::Failed {
            kind: "network".into(),
            message: "connection refused".into(),
        })
        .unwrap();
        assert_eq!(failed["type"], "failed");
        assert_eq!(failed["kind"], "network");
    }
}
