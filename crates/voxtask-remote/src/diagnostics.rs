//! HTTP sink for interaction logs.

use async_trait::async_trait;
use reqwest::Client;
use voxtask_action::{DiagnosticsError, DiagnosticsSink, InteractionLog};
use voxtask_core::config::DiagnosticsConfig;

use crate::http::{build_client, read_response};

const TIMEOUT_SECS: u64 = 10;

/// Posts each interaction log as JSON to a logging endpoint.
pub struct HttpDiagnosticsSink {
    client: Client,
    url: String,
}

impl HttpDiagnosticsSink {
    pub fn new(url: impl Into<String>) -> voxtask_core::Result<Self> {
        Ok(Self {
            client: build_client(TIMEOUT_SECS)?,
            url: url.into(),
        })
    }

    pub fn from_config(config: &DiagnosticsConfig) -> voxtask_core::Result<Self> {
        Self::new(config.url.clone())
    }
}

#[async_trait]
impl DiagnosticsSink for HttpDiagnosticsSink {
    async fn send(&self, log: &InteractionLog) -> Result<(), DiagnosticsError> {
        let response = self
            .client
            .post(&self.url)
            .json(log)
            .send()
            .await
            .map_err(|e| DiagnosticsError::Request(e.to_string()))?;
        let raw = read_response(response)
            .await
            .map_err(|e| DiagnosticsError::Request(e.to_string()))?;
        if !raw.status.is_success() {
            return Err(DiagnosticsError::Http {
                status: raw.status.as_u16(),
                message: raw.body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use voxtask_action::BatchStatus;

    fn log() -> InteractionLog {
        InteractionLog::new(
            "close buy milk",
            "Task ID: 42, Content: 'Buy milk'\n",
            "[]",
            BatchStatus::Canceled,
            Some("wrong task"),
            "0.1",
        )
    }

    #[tokio::test]
    async fn test_send_posts_log_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({
                "user_input": "close buy milk",
                "action_status": "canceled",
                "user_feedback": "wrong task",
                "prompt_version": "0.1"
            })))
            .with_status(200)
            .create_async()
            .await;

        let sink = HttpDiagnosticsSink::new(server.url()).unwrap();
        sink.send(&log()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(502)
            .create_async()
            .await;

        let sink = HttpDiagnosticsSink::new(server.url()).unwrap();
        let err = sink.send(&log()).await.unwrap_err();
        assert!(matches!(err, DiagnosticsError::Http { status: 502, .. }));
    }
}
