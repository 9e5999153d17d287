use serde::Serialize;

/// Structured trace events emitted across all Parley crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    TurnAppended {
        session_id: String,
        turn_id: u64,
        speaker: String,
        chars: usize,
    },
    TurnRolledBack {
        session_id: String,
        turn_id: u64,
        speaker: String,
    },
    RequestBuilt {
        session_id: String,
        turns: usize,
        first_user_turn: bool,
        system_instruction: bool,
    },
    EndpointCall {
        endpoint: String,
        model: String,
        status: Option<u16>,
        duration_ms: u64,
        candidates: usize,
    },
    SubmissionFailed {
        session_id: String,
        kind: String,
        message: String,
    },
    FallbackSubstituted {
        session_id: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "pl_event");
    }
}
