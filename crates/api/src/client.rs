use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, header};
use serde_json::Value;
use soar_util::redact_sensitive;
use tracing::{debug, warn};
use url::Url;

use crate::error::ApiError;

/// Header carrying the SOAR API application key (`AppKey`).
const APP_KEY_HEADER: header::HeaderName = header::HeaderName::from_static("appkey");
/// Hostnames allowed to use plain HTTP without a warning.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "::1", "[::1]"];
/// Upper bound on the error body kept for diagnostics.
const MAX_ERROR_BODY: usize = 2048;

/// Thin wrapper around a configured `reqwest::Client` for SOAR API access.
///
/// The client pre-configures the `AppKey` and `Accept` headers and resolves
/// request paths against a validated base URL.
#[derive(Debug, Clone)]
pub struct SoarClient {
    base_url: String,
    http: Client,
    user_agent: String,
}

impl SoarClient {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Construct a client for `base_url`.
    ///
    /// When `app_key` is `None` or empty no `AppKey` header is sent.
    pub fn new(base_url: &str, app_key: Option<&str>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = validate_base_url(base_url)?;

        let mut default_headers = header::HeaderMap::new();
        if let Some(app_key) = app_key.filter(|key| !key.is_empty()) {
            let mut value = header::HeaderValue::from_str(app_key).map_err(|_| ApiError::InvalidAppKey)?;
            value.set_sensitive(true);
            default_headers.insert(APP_KEY_HEADER, value);
        }
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("secops-soar-mcp/{}; {}", env!("CARGO_PKG_VERSION"), std::env::consts::OS),
        })
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    ///
    /// `path` may carry its own query string; extra query pairs appended later
    /// keep it intact.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let raw_url = format!("{}{}", self.base_url, path);
        let url = Url::parse(&raw_url).map_err(|error| ApiError::InvalidRequestUrl {
            url: raw_url.clone(),
            reason: error.to_string(),
        })?;
        debug!(%method, %url, "building request");

        Ok(self.http.request(method, url).header(header::USER_AGENT, &self.user_agent))
    }

    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Value, ApiError> {
        let request = builder.build().map_err(|source| ApiError::Transport {
            url: self.base_url.clone(),
            source,
        })?;
        let url = request.url().to_string();
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;

        if !status.is_success() {
            let mut body = redact_sensitive(&String::from_utf8_lossy(&bytes));
            truncate_on_char_boundary(&mut body, MAX_ERROR_BODY);
            debug!(%url, %status, %body, "SOAR request failed");
            return Err(ApiError::Status { status, url, body });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode { url, source })
    }
}

/// Validate and normalize the configured base URL.
///
/// Rules:
/// - scheme must be `http` or `https` and a host must be present
/// - plain `http` to a non-local host is accepted with a warning
/// - a trailing slash is removed so API paths can be appended verbatim
fn validate_base_url(base: &str) -> Result<String, ApiError> {
    let trimmed = base.trim();
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason,
    };
    let parsed = Url::parse(trimmed).map_err(|error| invalid(error.to_string()))?;

    let host_name = parsed
        .host_str()
        .ok_or_else(|| invalid("base URL must include a host".to_string()))?;

    match parsed.scheme() {
        "https" => {}
        "http" => {
            let is_local = LOCALHOST_DOMAINS
                .iter()
                .any(|&allowed| host_name.eq_ignore_ascii_case(allowed));
            if !is_local {
                warn!(host = host_name, "SOAR base URL uses plain http for a non-local host");
            }
        }
        other => return Err(invalid(format!("unsupported scheme '{other}://' (expected http or https)"))),
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("base URL cannot carry a query or fragment".to_string()));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn truncate_on_char_boundary(text: &mut String, max_len: usize) {
    if text.len() <= max_len {
        return;
    }
    let mut cut = max_len;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https_and_local_http() {
        assert_eq!(
            validate_base_url("https://soar.example.com/").unwrap(),
            "https://soar.example.com"
        );
        assert_eq!(validate_base_url("http://localhost:8080").unwrap(), "http://localhost:8080");
        assert_eq!(
            validate_base_url(" https://tenant.siemplify-soar.com/base/ ").unwrap(),
            "https://tenant.siemplify-soar.com/base"
        );
    }

    #[test]
    fn rejects_unusable_urls() {
        assert!(matches!(validate_base_url("ftp://soar.example.com"), Err(ApiError::InvalidBaseUrl { .. })));
        assert!(matches!(validate_base_url("not a url"), Err(ApiError::InvalidBaseUrl { .. })));
        assert!(matches!(
            validate_base_url("https://soar.example.com?x=1"),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn rejects_header_unsafe_app_key() {
        let result = SoarClient::new("https://soar.example.com", Some("bad\nkey"), SoarClient::DEFAULT_TIMEOUT);
        assert!(matches!(result, Err(ApiError::InvalidAppKey)));
    }

    #[test]
    fn request_keeps_embedded_query() {
        let client = SoarClient::new("https://soar.example.com/", None, SoarClient::DEFAULT_TIMEOUT).unwrap();
        let request = client
            .request(Method::GET, "/api/1p/external/v1/integrations/X/integrationInstances?$select=identifier")
            .unwrap()
            .query(&[("pageToken", "t1")])
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://soar.example.com/api/1p/external/v1/integrations/X/integrationInstances?$select=identifier&pageToken=t1"
        );
    }

    #[test]
    fn truncates_long_bodies_on_char_boundary() {
        let mut text = "é".repeat(10);
        truncate_on_char_boundary(&mut text, 5);
        assert_eq!(text, "éé");
    }
}
