//! Terminal host for a Parley session.

pub mod cli;
