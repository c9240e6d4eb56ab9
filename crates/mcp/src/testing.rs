//! Recording in-memory backend for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use soar_api::{ApiError, SoarBackend};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum FakeResponse {
    Json(Value),
    Fail(String),
}

/// Answers each `(method, path)` with a fixed response and records every call.
#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    responses: Mutex<HashMap<(&'static str, String), FakeResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, method: &'static str, path: impl Into<String>, body: Value) -> Self {
        self.insert(method, path.into(), FakeResponse::Json(body));
        self
    }

    pub fn fail(self, method: &'static str, path: impl Into<String>, reason: &str) -> Self {
        self.insert(method, path.into(), FakeResponse::Fail(reason.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn calls_to(&self, method: &str, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method && call.path == path)
            .collect()
    }

    fn insert(&self, method: &'static str, path: String, response: FakeResponse) {
        self.responses.lock().expect("responses lock").insert((method, path), response);
    }

    fn answer(&self, method: &'static str, path: &str, query: &[(&str, &str)], body: Option<&Value>) -> Result<Value, ApiError> {
        self.calls.lock().expect("calls lock").push(RecordedCall {
            method,
            path: path.to_string(),
            query: query.iter().map(|(key, value)| (key.to_string(), value.to_string())).collect(),
            body: body.cloned(),
        });
        let response = self
            .responses
            .lock()
            .expect("responses lock")
            .get(&(method, path.to_string()))
            .cloned()
            .unwrap_or_else(|| FakeResponse::Fail(format!("no response configured for {method} {path}")));
        match response {
            FakeResponse::Json(value) => Ok(value),
            FakeResponse::Fail(reason) => Err(ApiError::UnexpectedShape {
                url: path.to_string(),
                reason,
            }),
        }
    }
}

#[async_trait]
impl SoarBackend for FakeBackend {
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.answer("GET", path, query, None)
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.answer("POST", path, &[], Some(body))
    }

    async fn patch_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.answer("PATCH", path, &[], Some(body))
    }
}
