use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session behaviour
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Per-session conversation settings injected into the session client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Optional ASSISTANT turn seeded into the transcript at session start.
    /// Never sent to the endpoint.
    #[serde(default)]
    pub greeting: Option<String>,

    /// System/persona instruction. How it reaches the endpoint depends on
    /// `instruction_mode`.
    #[serde(default)]
    pub persona: String,

    /// Text committed as the ASSISTANT turn when the endpoint succeeds but
    /// returns nothing usable.
    #[serde(default = "d_fallback_text")]
    pub fallback_text: String,

    #[serde(default)]
    pub instruction_mode: InstructionMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting: None,
            persona: String::new(),
            fallback_text: d_fallback_text(),
            instruction_mode: InstructionMode::default(),
        }
    }
}

/// Where the persona instruction is placed in outgoing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionMode {
    /// Folded into the first USER element of the session's first request,
    /// and sent exactly once.
    #[default]
    FirstUserTurn,
    /// Sent on every request as the endpoint's persistent system
    /// instruction; never folded into turns.
    SystemRole,
}

/// Fixed sampling parameters attached to every request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "d_500")]
    pub max_output_tokens: u32,
    #[serde(default = "d_temperature")]
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: d_500(),
            temperature: d_temperature(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_fallback_text() -> String {
    "Sorry, I could not generate a response.".into()
}
fn d_500() -> u32 {
    500
}
fn d_temperature() -> f32 {
    0.7
}
