//! Read-only handle onto a [`TranscriptStore`].

use std::sync::Arc;

use pl_domain::turn::Turn;
use tokio::sync::broadcast;

use crate::store::{TranscriptEvent, TranscriptStore};

/// Shared read access to a transcript owned by someone else.
///
/// Cloning is cheap. Holders can read and subscribe but never append or
/// roll back, so the owner stays the only writer.
///
/// ```compile_fail
/// fn inject(view: &pl_transcript::TranscriptView) {
///     let _ = view.append(pl_domain::turn::Speaker::Assistant, "injected");
/// }
/// ```
#[derive(Clone)]
pub struct TranscriptView {
    store: Arc<TranscriptStore>,
}

impl TranscriptView {
    pub fn new(store: Arc<TranscriptStore>) -> Self {
        Self { store }
    }

    pub fn session_id(&self) -> &str {
        self.store.session_id()
    }

    pub fn snapshot(&self) -> Vec<Turn> {
        self.store.snapshot()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn last(&self) -> Option<Turn> {
        self.store.last()
    }

    pub fn has_user_turn(&self) -> bool {
        self.store.has_user_turn()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TranscriptEvent> {
        self.store.subscribe()
    }
}
