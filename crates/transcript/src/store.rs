//! Ordered turn log with append/rollback invariants.
//!
//! Writes come from a single owner (the session client); reads may happen
//! from any thread at any time and always observe a whole number of turns.

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::broadcast;

use pl_domain::error::{Error, Result};
use pl_domain::trace::TraceEvent;
use pl_domain::turn::{Speaker, Turn};

/// Change notification for presentation collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranscriptEvent {
    Appended { turn: Turn },
    RolledBack { turn: Turn },
}

struct Inner {
    turns: Vec<Turn>,
    /// Next id to hand out. Never decremented.
    next_id: u64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TranscriptStore
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The turn sequence of one session.
pub struct TranscriptStore {
    session_id: String,
    inner: RwLock<Inner>,
    events: broadcast::Sender<TranscriptEvent>,
}

impl TranscriptStore {
    /// Create an empty transcript.
    pub fn new(session_id: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            session_id: session_id.into(),
            inner: RwLock::new(Inner {
                turns: Vec::new(),
                next_id: 1,
            }),
            events,
        }
    }

    /// Create a transcript seeded with one ASSISTANT greeting turn.
    pub fn with_greeting(session_id: impl Into<String>, greeting: &str) -> Result<Self> {
        let store = Self::new(session_id);
        store.append(Speaker::Assistant, greeting)?;
        Ok(store)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Append a turn and return it.
    ///
    /// Fails with [`Error::Validation`] when `text` is blank and with
    /// [`Error::InvalidState`] when `speaker` matches the current tail.
    /// The text is stored verbatim.
    pub fn append(&self, speaker: Speaker, text: &str) -> Result<Turn> {
        if text.trim().is_empty() {
            return Err(Error::Validation("turn text must not be empty".into()));
        }

        let turn = {
            let mut inner = self.inner.write();
            if let Some(tail) = inner.turns.last() {
                if tail.speaker == speaker {
                    return Err(Error::InvalidState(format!(
                        "cannot append two consecutive {speaker} turns (tail id {})",
                        tail.id
                    )));
                }
            }

            let turn = Turn {
                id: inner.next_id,
                speaker,
                text: text.to_owned(),
                created_at: Utc::now(),
            };
            inner.next_id += 1;
            inner.turns.push(turn.clone());
            turn
        };

        TraceEvent::TurnAppended {
            session_id: self.session_id.clone(),
            turn_id: turn.id,
            speaker: speaker.to_string(),
            chars: turn.text.chars().count(),
        }
        .emit();

        // No subscribers is fine.
        let _ = self.events.send(TranscriptEvent::Appended { turn: turn.clone() });

        Ok(turn)
    }

    /// Remove and return the most recently appended turn.
    ///
    /// Only ever undoes one step; the id counter is left untouched so the
    /// removed id is never handed out again.
    pub fn rollback_last(&self) -> Result<Turn> {
        let turn = self
            .inner
            .write()
            .turns
            .pop()
            .ok_or_else(|| Error::InvalidState("rollback on an empty transcript".into()))?;

        TraceEvent::TurnRolledBack {
            session_id: self.session_id.clone(),
            turn_id: turn.id,
            speaker: turn.speaker.to_string(),
        }
        .emit();

        let _ = self
            .events
            .send(TranscriptEvent::RolledBack { turn: turn.clone() });

        Ok(turn)
    }

    /// Point-in-time copy of all turns in append order.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.inner.read().turns.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().turns.is_empty()
    }

    pub fn last(&self) -> Option<Turn> {
        self.inner.read().turns.last().cloned()
    }

    /// Whether any USER turn has been committed in this session.
    pub fn has_user_turn(&self) -> bool {
        self.inner.read().turns.iter().any(Turn::is_user)
    }

    /// Subscribe to append/rollback notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<TranscriptEvent> {
        self.events.subscribe()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_assigns_increasing_ids() {
        let store = TranscriptStore::new("s1");
        let a = store.append(Speaker::User, "hi").unwrap();
        let b = store.append(Speaker::Assistant, "hello").unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn blank_text_is_rejected() {
        let store = TranscriptStore::new("s1");
        let err = store.append(Speaker::User, "  \n\t").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn text_is_stored_verbatim() {
        let store = TranscriptStore::new("s1");
        let turn = store.append(Speaker::User, "  spaced  ").unwrap();
        assert_eq!(turn.text, "  spaced  ");
    }

    #[test]
    fn consecutive_same_speaker_is_rejected() {
        let store = TranscriptStore::new("s1");
        store.append(Speaker::User, "one").unwrap();
        let err = store.append(Speaker::User, "two").unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rollback_on_empty_is_invalid_state() {
        let store = TranscriptStore::new("s1");
        assert!(matches!(
            store.rollback_last().unwrap_err(),
            Error::InvalidState(_)
        ));
    }

    #[test]
    fn rolled_back_id_is_not_reused() {
        let store = TranscriptStore::with_greeting("s1", "welcome").unwrap();
        let user = store.append(Speaker::User, "first try").unwrap();
        assert_eq!(user.id, 2);

        let removed = store.rollback_last().unwrap();
        assert_eq!(removed, user);
        assert_eq!(store.last().unwrap().speaker, Speaker::Assistant);

        let retry = store.append(Speaker::User, "second try").unwrap();
        assert_eq!(retry.id, 3);
    }

    #[test]
    fn greeting_seeds_one_assistant_turn() {
        let store = TranscriptStore::with_greeting("s1", "Namaste").unwrap();
        let turns = store.snapshot();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].speaker, Speaker::Assistant);
        assert!(!store.has_user_turn());
    }

    #[test]
    fn snapshot_is_detached_from_later_writes() {
        let store = TranscriptStore::new("s1");
        store.append(Speaker::User, "q").unwrap();
        let snap = store.snapshot();
        store.append(Speaker::Assistant, "a").unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn subscribers_see_appends_and_rollbacks() {
        let store = TranscriptStore::new("s1");
        let mut rx = store.subscribe();

        let turn = store.append(Speaker::User, "ping").unwrap();
        store.rollback_last().unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            TranscriptEvent::Appended { turn: turn.clone() }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            TranscriptEvent::RolledBack { turn }
        );
    }
}
