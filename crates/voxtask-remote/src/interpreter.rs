//! HTTP client for the command interpreter worker.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use voxtask_action::{CommandInterpreter, InterpreterError};
use voxtask_core::config::InterpreterConfig;

use crate::http::{build_client, read_response};

#[derive(Serialize)]
struct InterpretRequest<'a> {
    #[serde(rename = "UserInput")]
    user_input: &'a str,
    #[serde(rename = "TaskString")]
    task_string: &'a str,
}

#[derive(Deserialize)]
struct InterpretResponse {
    #[serde(rename = "AIResponse")]
    ai_response: Option<String>,
}

/// Interpreter reached over HTTP.
pub struct HttpInterpreter {
    client: Client,
    url: String,
}

impl HttpInterpreter {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> voxtask_core::Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            url: url.into(),
        })
    }

    pub fn from_config(config: &InterpreterConfig) -> voxtask_core::Result<Self> {
        Self::new(config.url.clone(), config.timeout_secs)
    }
}

#[async_trait]
impl CommandInterpreter for HttpInterpreter {
    async fn interpret(
        &self,
        transcript: &str,
        task_context: &str,
    ) -> Result<String, InterpreterError> {
        let body = InterpretRequest {
            user_input: transcript,
            task_string: task_context,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| InterpreterError::Request(e.to_string()))?;
        let raw = read_response(response)
            .await
            .map_err(|e| InterpreterError::Request(format!("Failed to read response: {e}")))?;

        if !raw.status.is_success() {
            return Err(InterpreterError::Http {
                status: raw.status.as_u16(),
                message: raw.body,
            });
        }

        let parsed: InterpretResponse =
            serde_json::from_str(&raw.body).map_err(|_| InterpreterError::MissingResponse)?;
        let text = parsed.ai_response.ok_or(InterpreterError::MissingResponse)?;
        debug!(response_len = text.len(), "Interpreter responded");
        Ok(text)
    }
}
