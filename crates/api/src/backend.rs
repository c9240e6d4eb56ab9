use std::collections::BTreeSet;
use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::client::SoarClient;
use crate::endpoints;
use crate::error::ApiError;

/// Request surface the tool layer needs from the SOAR backend.
///
/// Every method resolves `path` against the backend base URL, sends the
/// `AppKey` header, and decodes the JSON body. An empty 2xx body decodes to
/// `Value::Null`.
#[async_trait]
pub trait SoarBackend: Send + Sync + Debug {
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError>;

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    async fn patch_json(&self, path: &str, body: &Value) -> Result<Value, ApiError>;
}

#[async_trait]
impl SoarBackend for SoarClient {
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        let mut builder = self.request(Method::GET, path)?;
        if !query.is_empty() {
            builder = builder.query(query);
        }
        self.send(builder).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let builder = self.request(Method::POST, path)?.json(body);
        self.send(builder).await
    }

    async fn patch_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let builder = self.request(Method::PATCH, path)?.json(body);
        self.send(builder).await
    }
}

/// Fetch the scope names the backend accepts for predefined-scope actions.
///
/// The backend answers with a JSON array of strings.
pub async fn fetch_valid_scopes(backend: &dyn SoarBackend) -> Result<BTreeSet<String>, ApiError> {
    let response = backend.get_json(endpoints::GET_SCOPES, &[]).await?;
    let unexpected = |reason: String| ApiError::UnexpectedShape {
        url: endpoints::GET_SCOPES.to_string(),
        reason,
    };

    let Value::Array(entries) = response else {
        return Err(unexpected(format!("expected an array of scope names, got {}", json_kind(&response))));
    };

    let mut scopes = BTreeSet::new();
    for entry in entries {
        match entry {
            Value::String(scope) => {
                scopes.insert(scope);
            }
            other => return Err(unexpected(format!("expected a scope name, got {}", json_kind(&other)))),
        }
    }
    debug!(count = scopes.len(), "fetched valid scopes");
    Ok(scopes)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
