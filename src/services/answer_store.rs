use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::core::config::Settings;

/// REST client for the schemaless answer store. Nodes are addressed by path
/// and served as JSON: GET returns the node (or `null`), POST appends a child
/// under a server-generated key, PATCH merges children, PUT replaces.
#[derive(Debug, Clone)]
pub(crate) struct AnswerStoreClient {
    client: Client,
    base_url: String,
    answers_path: String,
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("answer store request for {path} failed")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("answer store {method} {path} returned status {status}: {body}")]
    Status { method: &'static str, path: String, status: StatusCode, body: String },
    #[error("answer store returned an invalid body for {path}")]
    InvalidBody {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("answer store POST {path} response carries no generated key")]
    MissingKey { path: String },
}

impl AnswerStoreClient {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.answer_store().base_url,
            &settings.answer_store().answers_path,
            Duration::from_secs(settings.answer_store().timeout_seconds),
        )
    }

    pub(crate) fn new(base_url: &str, answers_path: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(20))
            .timeout(timeout)
            .build()
            .context("Failed to build answer store HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            answers_path: answers_path.trim_matches('/').to_string(),
        })
    }

    fn node_url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path.trim_matches('/'))
    }

    /// Full snapshot of the raw answer collection as (key, record) pairs.
    /// The store has no cursor primitive, so every poll refetches everything.
    pub(crate) async fn fetch_answers(&self) -> Result<Vec<(String, Value)>, StoreError> {
        let path = self.answers_path.clone();
        let payload = self.get(&path).await?;
        Ok(snapshot_entries(payload))
    }

    pub(crate) async fn get(&self, path: &str) -> Result<Value, StoreError> {
        let response = self
            .client
            .get(self.node_url(path))
            .send()
            .await
            .map_err(|source| StoreError::Transport { path: path.to_string(), source })?;

        parse_body("GET", path, response).await
    }

    /// Appends a record; the store replies with the generated child key under
    /// a `name` field.
    pub(crate) async fn push(&self, path: &str, record: &Value) -> Result<String, StoreError> {
        let response = self
            .client
            .post(self.node_url(path))
            .json(record)
            .send()
            .await
            .map_err(|source| StoreError::Transport { path: path.to_string(), source })?;

        let parsed = parse_body("POST", path, response).await?;
        parsed
            .get("name")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| StoreError::MissingKey { path: path.to_string() })
    }

    /// Merges children into the node at `path`, leaving siblings intact.
    pub(crate) async fn patch(&self, path: &str, children: &Value) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(self.node_url(path))
            .json(children)
            .send()
            .await
            .map_err(|source| StoreError::Transport { path: path.to_string(), source })?;

        parse_body("PATCH", path, response).await?;
        Ok(())
    }

    /// Replaces the node at `path` wholesale.
    pub(crate) async fn put(&self, path: &str, value: &Value) -> Result<(), StoreError> {
        let response = self
            .client
            .put(self.node_url(path))
            .json(value)
            .send()
            .await
            .map_err(|source| StoreError::Transport { path: path.to_string(), source })?;

        parse_body("PUT", path, response).await?;
        Ok(())
    }
}

async fn parse_body(
    method: &'static str,
    path: &str,
    response: reqwest::Response,
) -> Result<Value, StoreError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| StoreError::Transport { path: path.to_string(), source })?;

    if !status.is_success() {
        return Err(StoreError::Status { method, path: path.to_string(), status, body });
    }

    serde_json::from_str(&body)
        .map_err(|source| StoreError::InvalidBody { path: path.to_string(), source })
}

fn snapshot_entries(payload: Value) -> Vec<(String, Value)> {
    match payload {
        Value::Null => Vec::new(),
        Value::Object(map) => map.into_iter().filter(|(_, value)| !value.is_null()).collect(),
        // Nodes whose keys are small integers come back as arrays with null
        // holes; the index doubles as the key.
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, value)| !value.is_null())
            .map(|(idx, value)| (idx.to_string(), value))
            .collect(),
        other => {
            tracing::warn!(
                payload_type = json_type_name(&other),
                "Unexpected answer snapshot shape; treating as empty"
            );
            Vec::new()
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
