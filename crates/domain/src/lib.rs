//! Shared types for Parley: turns, the error taxonomy, configuration and
//! structured trace events.

pub mod config;
pub mod error;
pub mod trace;
pub mod turn;

pub use error::{Error, Result};
pub use turn::{Speaker, Turn};
