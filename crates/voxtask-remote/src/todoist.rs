//! Todoist REST adapter for the `TaskStore` port.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use tracing::debug;
use voxtask_action::{DueUpdate, StoreError, TaskPatch, TaskStore};
use voxtask_core::config::TodoistConfig;
use voxtask_core::{Task, TaskId};

use crate::http::{build_client, join_url, read_response};

/// Due expression Todoist interprets as "remove the due date".
const CLEAR_DUE: &str = "no date";

/// Task store backed by the Todoist REST API.
pub struct TodoistClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TodoistClient {
    /// Create a client for the given API base URL and token.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout_secs: u64,
    ) -> voxtask_core::Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    /// Create a client from configuration plus the resolved API token.
    pub fn from_config(
        config: &TodoistConfig,
        token: impl Into<String>,
    ) -> voxtask_core::Result<Self> {
        Self::new(config.api_url.clone(), token, config.timeout_secs)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }

    /// Send a request and return the body of a successful response.
    ///
    /// A 404 on a request about `subject` becomes [`StoreError::NotFound`].
    async fn send(
        &self,
        request: RequestBuilder,
        subject: Option<&TaskId>,
    ) -> Result<String, StoreError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let raw = read_response(response)
            .await
            .map_err(|e| StoreError::Transport(format!("Failed to read response: {e}")))?;

        if raw.status == StatusCode::NOT_FOUND {
            if let Some(id) = subject {
                return Err(StoreError::NotFound(id.clone()));
            }
        }
        if !raw.status.is_success() {
            return Err(StoreError::Http {
                status: raw.status.as_u16(),
                message: raw.body,
            });
        }
        Ok(raw.body)
    }

    fn task_url(&self, id: &TaskId) -> String {
        join_url(&self.base_url, &format!("tasks/{}", id))
    }
}

/// Body of create and update requests.
#[derive(Serialize)]
struct TaskWrite<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_string: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_lang: Option<&'a str>,
}

impl<'a> TaskWrite<'a> {
    fn from_patch(patch: &'a TaskPatch) -> Self {
        let (due_string, due_lang) = match &patch.due {
            DueUpdate::Keep => (None, None),
            DueUpdate::Clear => (Some(CLEAR_DUE), None),
            DueUpdate::Set { string, lang } => (Some(string.as_str()), lang.as_deref()),
        };
        Self {
            content: &patch.content,
            due_string,
            due_lang,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))
}

#[async_trait]
impl TaskStore for TodoistClient {
    async fn list_tasks(&self, filter: &str) -> Result<Vec<Task>, StoreError> {
        let request = self
            .client
            .get(join_url(&self.base_url, "tasks"))
            .query(&[("filter", filter)]);
        let tasks: Vec<Task> = decode(&self.send(request, None).await?)?;
        debug!(filter, count = tasks.len(), "Fetched tasks");
        Ok(tasks)
    }

    async fn get_task(&self, id: &TaskId) -> Result<Task, StoreError> {
        let request = self.client.get(self.task_url(id));
        decode(&self.send(request, Some(id)).await?)
    }

    async fn add_task(
        &self,
        content: &str,
        due_string: Option<&str>,
        due_lang: Option<&str>,
    ) -> Result<Task, StoreError> {
        let body = TaskWrite {
            content,
            due_string,
            due_lang,
        };
        let request = self.client.post(join_url(&self.base_url, "tasks")).json(&body);
        decode(&self.send(request, None).await?)
    }

    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
        let request = self
            .client
            .post(self.task_url(id))
            .json(&TaskWrite::from_patch(patch));
        self.send(request, Some(id)).await?;
        Ok(())
    }

    async fn close_task(&self, id: &TaskId) -> Result<(), StoreError> {
        let request = self.client.post(format!("{}/close", self.task_url(id)));
        self.send(request, Some(id)).await?;
        Ok(())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), StoreError> {
        let request = self.client.delete(self.task_url(id));
        self.send(request, Some(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    const TOKEN: &str = "test-token";

    fn client(server: &mockito::ServerGuard) -> TodoistClient {
        TodoistClient::new(server.url(), TOKEN, 5).unwrap()
    }

    #[tokio::test]
    async fn test_list_tasks_sends_filter_and_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tasks")
            .match_query(Matcher::UrlEncoded("filter".into(), "today | 7 days".into()))
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"42","content":"Buy milk","due":{"string":"today","date":"2026-10-19"}},{"id":"43","content":"Read","due":null}]"#)
            .create_async()
            .await;

        let tasks = client(&server).list_tasks("today | 7 days").await.unwrap();
        mock.assert_async().await;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].due_string(), Some("today"));
        assert!(tasks[1].due.is_none());
    }

    #[tokio::test]
    async fn test_list_tasks_bad_filter_is_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tasks")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body("Invalid filter")
            .create_async()
            .await;

        let err = client(&server).list_tasks("((").await.unwrap_err();
        assert_eq!(
            err,
            StoreError::Http {
                status: 400,
                message: "Invalid filter".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_get_task_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tasks/99")
            .with_status(404)
            .create_async()
            .await;

        let err = client(&server).get_task(&TaskId::from("99")).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound(TaskId::from("99")));
    }

    #[tokio::test]
    async fn test_get_task_undecodable_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tasks/1")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let err = client(&server).get_task(&TaskId::from("1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[tokio::test]
    async fn test_add_task_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/tasks")
            .match_body(Matcher::Json(json!({
                "content": "Call Bob  (🎉 created, awaiting confirmation)",
                "due_string": "tomorrow"
            })))
            .with_status(200)
            .with_body(r#"{"id":"501","content":"Call Bob  (🎉 created, awaiting confirmation)","due":{"string":"tomorrow"}}"#)
            .create_async()
            .await;

        let task = client(&server)
            .add_task("Call Bob  (🎉 created, awaiting confirmation)", Some("tomorrow"), None)
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(task.id, TaskId::from("501"));
    }

    #[tokio::test]
    async fn test_update_task_keep_due_omits_due_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/tasks/42")
            .match_body(Matcher::Json(json!({"content": "Buy milk"})))
            .with_status(204)
            .create_async()
            .await;

        client(&server)
            .update_task(&TaskId::from("42"), &TaskPatch::new("Buy milk", DueUpdate::Keep))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_task_clear_and_set_due() {
        let mut server = mockito::Server::new_async().await;
        let clear = server
            .mock("POST", "/tasks/5")
            .match_body(Matcher::Json(json!({"content": "Read", "due_string": "no date"})))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;
        let set = server
            .mock("POST", "/tasks/6")
            .match_body(Matcher::Json(
                json!({"content": "Read", "due_string": "morgen", "due_lang": "de"}),
            ))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let c = client(&server);
        c.update_task(&TaskId::from("5"), &TaskPatch::new("Read", DueUpdate::Clear))
            .await
            .unwrap();
        c.update_task(
            &TaskId::from("6"),
            &TaskPatch::new("Read", DueUpdate::set("morgen", Some("de"))),
        )
        .await
        .unwrap();
        clear.assert_async().await;
        set.assert_async().await;
    }

    #[tokio::test]
    async fn test_close_and_delete() {
        let mut server = mockito::Server::new_async().await;
        let close = server
            .mock("POST", "/tasks/42/close")
            .with_status(204)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/tasks/43")
            .with_status(204)
            .create_async()
            .await;

        let c = client(&server);
        c.close_task(&TaskId::from("42")).await.unwrap();
        c.delete_task(&TaskId::from("43")).await.unwrap();
        close.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/tasks/42/close")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let err = client(&server).close_task(&TaskId::from("42")).await.unwrap_err();
        assert!(matches!(err, StoreError::Http { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_is_transport_error() {
        let c = TodoistClient::new("http://127.0.0.1:1", TOKEN, 2).unwrap();
        let err = c.get_task(&TaskId::from("1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }
}
