//! OpenAI-compatible persona responder.
//!
//! Talks to any chat-completions endpoint that speaks the OpenAI wire
//! format. The persona directive frames the agent as a confused elderly
//! man whose job is to waste the counterpart's time while staying
//! believable.
//!
//! # Configuration
//!
//! ```ignore
//! let config = ResponderConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let responder = OpenAiResponder::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::{Intelligence, Message, Sender};
use crate::ports::{PersonaResponder, ResponderError};

/// System directive that keeps the persona in character.
const PERSONA_DIRECTIVE: &str = "Role: You are Amit, a retired 72-year-old man living in Mumbai. \
     You are lonely, talkative, and extremely technologically illiterate. \
     Goal: Keep the other party engaged for as long as possible to waste their time. \
     Behavior: \
     1. Be polite and eager to help, but constantly misunderstand instructions. \
     2. If asked for money or an OTP, agree to send it but fail due to technical issues \
     (forgot glasses, battery low, internet slow). \
     3. Ask irrelevant personal questions to distract them (Did you eat lunch? Do you know \
     my grandson Rahul?). \
     4. Never reveal you are an AI. \
     5. Keep responses short (1-3 sentences), informal, and natural.";

/// Configuration for the OpenAI-compatible responder.
#[derive(Debug, Clone)]
pub struct ResponderConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
    /// Sampling temperature. Slightly high so excuses stay varied.
    pub temperature: f32,
    /// Reply length cap in tokens.
    pub max_tokens: u32,
}

impl ResponderConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 1,
            temperature: 0.8,
            max_tokens: 150,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Persona responder backed by an OpenAI-compatible API.
pub struct OpenAiResponder {
    config: ResponderConfig,
    client: Client,
}

impl OpenAiResponder {
    /// Creates a responder with the given configuration.
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: ResponderConfig) -> Result<Self, ResponderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ResponderError::unavailable(format!("http client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Builds the wire request: persona directive first, then the
    /// conversation window mapped onto chat roles.
    fn to_wire_request(&self, window: &[Message]) -> WireRequest {
        let mut messages = vec![WireMessage {
            role: "system".to_string(),
            content: PERSONA_DIRECTIVE.to_string(),
        }];

        for msg in window {
            messages.push(WireMessage {
                role: match msg.sender() {
                    Sender::Counterpart => "user",
                    Sender::Agent => "assistant",
                }
                .to_string(),
                content: msg.text().to_string(),
            });
        }

        WireRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    async fn send_request(&self, window: &[Message]) -> Result<Response, ResponderError> {
        let wire_request = self.to_wire_request(window);

        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ResponderError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    ResponderError::network(format!("connection failed: {}", e))
                } else {
                    ResponderError::network(e.to_string())
                }
            })
    }

    async fn handle_response_status(
        &self,
        response: Response,
    ) -> Result<Response, ResponderError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(ResponderError::AuthenticationFailed),
            429 => Err(ResponderError::RateLimited {
                retry_after_secs: Self::parse_retry_after(&error_body),
            }),
            500..=599 => Err(ResponderError::unavailable(format!(
                "server error {}: {}",
                status, error_body
            ))),
            _ => Err(ResponderError::network(format!(
                "unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses retry-after from the error body, defaulting to 30s.
    fn parse_retry_after(error_body: &str) -> u32 {
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(error_body) {
            if let Some(msg) = parsed
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
            {
                if let Some(idx) = msg.find("try again in ") {
                    let rest = &msg[idx + 13..];
                    if let Some(num_end) = rest.find(|c: char| !c.is_ascii_digit()) {
                        if let Ok(secs) = rest[..num_end].parse::<u32>() {
                            return secs;
                        }
                    }
                }
            }
        }
        30
    }

    async fn parse_response(&self, response: Response) -> Result<String, ResponderError> {
        let response = self.handle_response_status(response).await?;

        let wire_response: WireResponse = response
            .json()
            .await
            .map_err(|e| ResponderError::parse(format!("failed to parse response: {}", e)))?;

        let choice = wire_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ResponderError::parse("no choices in response"))?;

        let reply = choice.message.content.trim().to_string();
        if reply.is_empty() {
            return Err(ResponderError::parse("empty completion content"));
        }
        Ok(reply)
    }
}

#[async_trait]
impl PersonaResponder for OpenAiResponder {
    async fn respond(
        &self,
        window: &[Message],
        _intelligence: &Intelligence,
    ) -> Result<String, ResponderError> {
        let mut last_error = ResponderError::network("no attempts made");
        let mut retry_count = 0;

        while retry_count <= self.config.max_retries {
            match self.send_request(window).await {
                Ok(response) => match self.parse_response(response).await {
                    Ok(reply) => return Ok(reply),
                    Err(err) => {
                        if !err.is_retryable() || retry_count >= self.config.max_retries {
                            return Err(err);
                        }
                        last_error = err;
                    }
                },
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    last_error = err;
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            let delay = Duration::from_secs(1 << retry_count);
            sleep(delay).await;
            retry_count += 1;
        }

        Err(last_error)
    }
}

// ----- Wire Types -----

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}
