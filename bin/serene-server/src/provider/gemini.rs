//! Google Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatProvider, ProviderError};
use crate::config::Config;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Finish reasons for which the candidate text must not be returned.
const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "RECITATION", "LANGUAGE"];

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Subset of the `generateContent` response we care about.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// [`ChatProvider`] backed by the Gemini REST API.
///
/// One prompt, one user turn, no system instruction and no generation
/// parameters: the model sees exactly the text the user typed.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    /// Full endpoint URL, model included.
    url: String,
}

impl GeminiProvider {
    pub fn new(
        api_key: impl Into<String>,
        model: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model
        );
        let client = reqwest::Client::builder()
            .user_agent(concat!("serene-server/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            url,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ProviderError> {
        Self::new(
            cfg.api_key.clone(),
            &cfg.model,
            &cfg.upstream_url,
            cfg.upstream_timeout,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let parsed: GenerateResponse =
            serde_json::from_slice(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;
        debug!(candidates = parsed.candidates.len(), "gemini response decoded");

        extract_text(parsed)
    }
}

/// Concatenate the text parts of the first candidate.
///
/// A candidate without text, or a response with neither candidates nor
/// prompt feedback, yields an empty reply.  Prompt feedback without any
/// candidate means the prompt was refused.
fn extract_text(response: GenerateResponse) -> Result<String, ProviderError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return match response.prompt_feedback {
            Some(PromptFeedback { block_reason: Some(reason) }) => Err(ProviderError::Blocked(reason)),
            Some(_) => Err(ProviderError::Empty),
            None => Ok(String::new()),
        };
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if BLOCKING_FINISH_REASONS.contains(&reason) {
            return Err(ProviderError::Blocked(reason.to_owned()));
        }
    }

    Ok(candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
