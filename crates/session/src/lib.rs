//! Single-flight conversational session for Parley.
//!
//! [`SessionClient`] turns each user submission into exactly one request to
//! a [`pl_providers::RemoteEndpoint`], commits the reply to the transcript,
//! or rolls the prompt back when the round-trip fails.

pub mod client;
pub mod request;

pub use client::{SessionClient, SessionEvent};
pub use request::build_request;
