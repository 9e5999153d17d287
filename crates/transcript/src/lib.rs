//! In-memory session transcript for Parley.
//!
//! An ordered, append-only log of turns that alternates strictly between
//! user and assistant. The only removal is [`TranscriptStore::rollback_last`],
//! used to undo a prompt whose round-trip failed. Readers outside the owner
//! get a [`TranscriptView`].

pub mod store;
pub mod view;

pub use store::{TranscriptEvent, TranscriptStore};
pub use view::TranscriptView;
