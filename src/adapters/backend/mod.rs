use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::adapters::host::HostProperties;
use crate::domain::MetricBatch;
use crate::error::AgentError;
use crate::ports::MetricSink;

const AGENT_PATH: &str = "/api/v1/agent";
const METRIC_PATH: &str = "/api/v1/metric";

/// HTTP client for the collector backend.
///
/// Every request body is a JSON object; the agent token is added to it
/// unless the caller already supplied one (registration sends the project
/// token instead).
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BackendClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        mut body: Map<String, Value>,
    ) -> Result<Map<String, Value>, AgentError> {
        if !body.contains_key("token") {
            let token = self.token.clone().map(Value::String).unwrap_or(Value::Null);
            body.insert("token".to_string(), token);
        }

        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Backend request");

        let response = self
            .client
            .request(method, &url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Exchange the project token for this agent's API key
    pub async fn register(&self, project_token: &str, name: &str) -> Result<String, AgentError> {
        let body = json!({ "token": project_token, "name": name });
        let response = self.request(Method::POST, AGENT_PATH, into_object(body)).await?;

        response
            .get("apiKey")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AgentError::Backend("registration response has no apiKey".to_string()))
    }

    /// Publish host properties for this agent
    pub async fn init(&self, properties: &HostProperties) -> Result<(), AgentError> {
        let body = json!({ "properties": properties });
        self.request(Method::PUT, AGENT_PATH, into_object(body)).await?;
        Ok(())
    }
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[async_trait]
impl MetricSink for BackendClient {
    async fn submit(&self, batch: &MetricBatch) -> Result<(), AgentError> {
        let body = into_object(serde_json::to_value(batch)?);
        self.request(Method::POST, METRIC_PATH, body).await?;
        Ok(())
    }
}
