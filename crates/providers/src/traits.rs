use pl_domain::error::{Error, Result};
use pl_domain::turn::Speaker;
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / Response types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Role tag on a serialized turn. The endpoint family calls the assistant
/// side `model`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Model,
}

impl From<Speaker> for WireRole {
    fn from(speaker: Speaker) -> Self {
        match speaker {
            Speaker::User => WireRole::User,
            Speaker::Assistant => WireRole::Model,
        }
    }
}

impl WireRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            WireRole::User => "user",
            WireRole::Model => "model",
        }
    }
}

/// One element of the serialized conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTurn {
    pub role: WireRole,
    pub content: String,
}

impl WireTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: WireRole::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: WireRole::Model,
            content: content.into(),
        }
    }
}

/// A provider-agnostic generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// The conversation, oldest first, ending with a `user` element.
    pub turns: Vec<WireTurn>,
    /// Persistent system instruction, for endpoints configured to receive
    /// the persona that way. `None` when the persona travels inside `turns`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    pub max_output_length: u32,
    pub temperature: f32,
}

/// Token usage for a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A provider-agnostic generation response.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResponse {
    /// Text of each returned candidate, in endpoint order. May be empty.
    pub candidates: Vec<String>,
    /// The model that produced the response.
    pub model: String,
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
}

impl GenerateResponse {
    /// The first candidate's text, or [`Error::EmptyResponse`] when there is
    /// no candidate or it is blank.
    pub fn first_text(&self) -> Result<&str> {
        self.candidates
            .first()
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
            .ok_or(Error::EmptyResponse)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Core endpoint trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The external generative-text service, as seen by the session client.
///
/// Implementations own transport, auth and wire format. They must report
/// transport failures (including timeouts) as [`Error::Network`] and
/// non-success or unreadable responses as [`Error::Endpoint`].
#[async_trait::async_trait]
pub trait RemoteEndpoint: Send + Sync {
    /// Send one request and wait for the full response.
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse>;

    /// A unique identifier for this endpoint instance.
    fn endpoint_id(&self) -> &str;
}
