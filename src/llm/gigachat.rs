//! GigaChat HTTP client — OAuth token exchange plus chat completion.
//!
//! GigaChat issues short-lived access tokens from an OAuth endpoint; the
//! completion endpoint takes the token as a Bearer credential. Tokens are
//! fetched fresh for every synthesis request and never cached.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::{GIGACHAT_SCOPE, GigaChatConfig};
use crate::error::LlmError;
use crate::llm::{PersonaSynthesizer, build_persona_prompt};
use crate::survey::QUESTIONS;

/// Fixed reply when the provider cannot be reached for a token.
pub const CONNECTION_ERROR_REPLY: &str = "Could not connect to GigaChat. Please try again later.";

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Client for the GigaChat OAuth and completion endpoints.
pub struct GigaChatClient {
    config: GigaChatConfig,
    client: reqwest::Client,
}

impl GigaChatClient {
    pub fn new(config: GigaChatConfig) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if config.insecure_tls {
            tracing::warn!(
                "TLS certificate verification disabled for GigaChat calls; \
                 only use this with the provider's private CA"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder.build().map_err(|e| LlmError::RequestFailed {
            reason: format!("failed to build HTTP client: {e}"),
        })?;
        Ok(Self { config, client })
    }

    /// Exchange the shared auth key for a short-lived access token.
    ///
    /// The `RqUID` header is a per-call trace id derived from the current
    /// time; the provider uses it for request correlation only.
    pub async fn fetch_access_token(&self) -> Result<String, LlmError> {
        let rquid = chrono::Utc::now().timestamp_millis().to_string();

        let resp = self
            .client
            .post(&self.config.token_url)
            .timeout(self.config.token_timeout)
            .header(
                "Authorization",
                format!("Basic {}", self.config.auth_key.expose_secret()),
            )
            .header("RqUID", &rquid)
            .form(&[("scope", GIGACHAT_SCOPE)])
            .send()
            .await
            .map_err(|e| LlmError::TokenAcquisition {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LlmError::TokenAcquisition {
                reason: format!("token endpoint returned {status}"),
            });
        }

        let token: TokenResponse = resp.json().await.map_err(|e| LlmError::TokenAcquisition {
            reason: format!("malformed token response: {e}"),
        })?;

        tracing::debug!(rquid, "access token obtained");
        Ok(token.access_token)
    }

    /// Request a completion for `prompt` using a previously obtained token.
    pub async fn complete(&self, access_token: &str, prompt: &str) -> Result<String, LlmError> {
        let body = CompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.config.temperature,
        };

        let resp = self
            .client
            .post(&self.config.completions_url)
            .timeout(self.config.completion_timeout)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LlmError::RequestFailed {
                reason: format!("completion endpoint returned {status}"),
            });
        }

        let completion: CompletionResponse =
            resp.json().await.map_err(|e| LlmError::InvalidResponse {
                reason: format!("malformed completion response: {e}"),
            })?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::InvalidResponse {
                reason: "completion response contained no choices".to_string(),
            })
    }
}

#[async_trait]
impl PersonaSynthesizer for GigaChatClient {
    /// Full synthesis round-trip: token exchange, prompt build, completion.
    ///
    /// Failures are converted to user-visible text here; nothing
    /// propagates to the conversation layer as an error.
    async fn synthesize(&self, answers: &[String]) -> String {
        let access_token = match self.fetch_access_token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::error!("GigaChat token acquisition failed: {e}");
                return CONNECTION_ERROR_REPLY.to_string();
            }
        };

        let prompt = build_persona_prompt(&QUESTIONS, answers);
        match self.complete(&access_token, &prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("GigaChat analysis failed: {e}");
                format!("Analysis failed: {e}")
            }
        }
    }
}
