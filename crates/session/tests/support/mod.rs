//! Test doubles for the session client.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use pl_domain::error::{Error, Result};
use pl_providers::{GenerateRequest, GenerateResponse, RemoteEndpoint};
use tokio::sync::Notify;

/// Replays canned replies in order and records every request it sees.
///
/// With a gate installed, each call parks until the test calls
/// [`ScriptedEndpoint::release`], which keeps the client Pending for as
/// long as the test needs.
#[derive(Default)]
pub struct ScriptedEndpoint {
    replies: Mutex<VecDeque<Result<GenerateResponse>>>,
    requests: Mutex<Vec<GenerateRequest>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Notify::new())),
            ..Self::default()
        }
    }

    pub fn reply(self, text: &str) -> Self {
        self.push(Ok(response(&[text])));
        self
    }

    pub fn no_candidates(self) -> Self {
        self.push(Ok(response(&[])));
        self
    }

    pub fn fail(self, error: Error) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, reply: Result<GenerateResponse>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn response(candidates: &[&str]) -> GenerateResponse {
    GenerateResponse {
        candidates: candidates.iter().map(|s| s.to_string()).collect(),
        model: "scripted".into(),
        finish_reason: Some("stop".into()),
        usage: None,
    }
}

#[async_trait::async_trait]
impl RemoteEndpoint for ScriptedEndpoint {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse> {
        self.requests.lock().unwrap().push(req.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Network("script exhausted".into())))
    }

    fn endpoint_id(&self) -> &str {
        "scripted"
    }
}
