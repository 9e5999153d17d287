//! Google Gemini adapter.
//!
//! Implements the Gemini `generateContent` API.
//! Auth is via an API key passed as a query parameter (`key={api_key}`).

use std::time::{Duration, Instant};

use crate::traits::{GenerateRequest, GenerateResponse, RemoteEndpoint, Usage};
use crate::util::{extract_error_message, from_reqwest, redact_url_key, resolve_api_key};
use pl_domain::config::ProviderConfig;
use pl_domain::error::{Error, Result};
use pl_domain::trace::TraceEvent;
use serde_json::{json, Value};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A [`RemoteEndpoint`] backed by the Google Gemini API.
pub struct GeminiEndpoint {
    id: String,
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiEndpoint {
    /// Create an endpoint from the deserialized provider config.
    ///
    /// Resolves the API key eagerly so a missing credential fails at
    /// startup rather than on the first submission.
    pub fn from_config(cfg: &ProviderConfig) -> Result<Self> {
        let api_key = resolve_api_key(&cfg.auth)?;

        let mut builder = reqwest::Client::builder();
        if cfg.timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(cfg.timeout_ms));
        }
        let client = builder.build().map_err(from_reqwest)?;

        Ok(Self {
            id: cfg.id.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: cfg.model.clone(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request serialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub(crate) fn build_body(req: &GenerateRequest) -> Value {
    let contents: Vec<Value> = req
        .turns
        .iter()
        .map(|turn| {
            json!({
                "role": turn.role.as_str(),
                "parts": [{"text": turn.content}],
            })
        })
        .collect();

    let mut body = json!({
        "contents": contents,
        "generationConfig": {
            "maxOutputTokens": req.max_output_length,
            "temperature": req.temperature,
        },
    });

    if let Some(si) = &req.system_instruction {
        body["systemInstruction"] = json!({
            "parts": [{"text": si}]
        });
    }

    body
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response deserialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn malformed(detail: impl std::fmt::Display) -> Error {
    Error::Endpoint {
        status: Some(200),
        message: format!("malformed response: {detail}"),
    }
}

/// Parse a successful `generateContent` body.
///
/// A missing `candidates` field is a valid, empty answer (Gemini omits it
/// when every candidate was filtered); anything that is not the expected
/// shape is reported as malformed.
pub(crate) fn parse_gemini_response(body: &Value, model: &str) -> Result<GenerateResponse> {
    if !body.is_object() {
        return Err(malformed("body is not a JSON object"));
    }

    let candidates = match body.get("candidates") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(candidate_text).collect(),
        Some(_) => return Err(malformed("'candidates' is not an array")),
    };

    let finish_reason = body
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .and_then(|c| c.get("finishReason"))
        .and_then(|v| v.as_str())
        .map(|s| match s {
            "STOP" => "stop".to_string(),
            "MAX_TOKENS" => "length".to_string(),
            other => other.to_lowercase(),
        });

    let usage = body.get("usageMetadata").and_then(parse_gemini_usage);

    let model = body
        .get("modelVersion")
        .and_then(|v| v.as_str())
        .unwrap_or(model)
        .to_string();

    Ok(GenerateResponse {
        candidates,
        model,
        finish_reason,
        usage,
    })
}

fn candidate_text(candidate: &Value) -> String {
    candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|v| v.as_str()))
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn parse_gemini_usage(v: &Value) -> Option<Usage> {
    let prompt = v.get("promptTokenCount")?.as_u64()?;
    let completion = v
        .get("candidatesTokenCount")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);
    let total = v
        .get("totalTokenCount")
        .and_then(|v| v.as_u64())
        .unwrap_or_else(|| prompt.saturating_add(completion));
    Some(Usage {
        prompt_tokens: clamp_u32(prompt),
        completion_tokens: clamp_u32(completion),
        total_tokens: clamp_u32(total),
    })
}

fn clamp_u32(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl RemoteEndpoint for GeminiEndpoint {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse> {
        let url = self.generate_url();
        let body = build_body(req);

        tracing::debug!(
            endpoint = %self.id,
            url = %redact_url_key(&url),
            turns = req.turns.len(),
            "gemini generate request"
        );

        let started = Instant::now();
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;

        let result = if status.is_success() {
            serde_json::from_str::<Value>(&resp_text)
                .map_err(malformed)
                .and_then(|v| parse_gemini_response(&v, &self.model))
        } else {
            Err(Error::Endpoint {
                status: Some(status.as_u16()),
                message: extract_error_message(status.as_u16(), &resp_text),
            })
        };

        TraceEvent::EndpointCall {
            endpoint: self.id.clone(),
            model: self.model.clone(),
            status: Some(status.as_u16()),
            duration_ms: started.elapsed().as_millis() as u64,
            candidates: result.as_ref().map(|r| r.candidates.len()).unwrap_or(0),
        }
        .emit();

        result
    }

    fn endpoint_id(&self) -> &str {
        &self.id
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
