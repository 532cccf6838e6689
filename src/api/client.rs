// SPDX-License-Identifier: MPL-2.0

use crate::config::DEFAULT_API_BASE;
use reqwest::Method;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;
use url::Url;

/// A failed backend call. `status` is `None` when no HTTP response arrived.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}{}", status_suffix(.status))]
pub struct RemoteError {
    pub status: Option<u16>,
    pub message: String,
}

impl RemoteError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: format!("invalid response: {}", message.into()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// One call against the REST surface.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the API base, e.g. `/blog/42`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            ..Self::get(path)
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::get(path)
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::PUT,
            body: Some(body),
            ..Self::get(path)
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

/// The REST backend. Bodies are returned raw; shape handling lives in
/// [`crate::api::response`].
pub trait Backend: Send + Sync + 'static {
    fn request(&self, request: ApiRequest)
    -> impl Future<Output = Result<Value, RemoteError>> + Send;
}

/// `reqwest` implementation of [`Backend`].
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<Url, RemoteError> {
        // Url::join would drop the base path ("/api") on a leading slash
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| RemoteError::network(format!("bad url {joined}: {e}")))
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE).expect("DEFAULT_API_BASE is a valid URL")
    }
}

impl Backend for HttpBackend {
    async fn request(&self, request: ApiRequest) -> Result<Value, RemoteError> {
        let url = self.url_for(&request.path)?;
        tracing::debug!(method = %request.method, %url, "backend request");

        let mut builder = self
            .http
            .request(request.method, url)
            .header("Content-Type", "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RemoteError::network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::network(e.to_string()))?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(v) => v,
                Err(_) if !status.is_success() => Value::String(text),
                Err(e) => return Err(RemoteError::invalid_response(e.to_string())),
            }
        };

        if status.is_success() {
            Ok(body)
        } else {
            Err(RemoteError::new(status.as_u16(), error_message(&body, status)))
        }
    }
}

/// Prefer the backend's own `message`, then the reason phrase.
fn error_message(body: &Value, status: reqwest::StatusCode) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .or_else(|| body.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}
