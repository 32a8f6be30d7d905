use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::ClientError;

/// Trait abstracting the single HTTP round trip, so tests can substitute
/// doubles for the real client.
///
/// One call, one request, one response. Retry, caching, and timeout policy
/// are all outside this contract: implementations surface whatever the
/// underlying transport decides as a [`ClientError`].
#[async_trait]
pub trait Requester: Send + Sync {
    async fn request(&self, url: Url, options: RequestOptions) -> Result<ApiResponse, ClientError>;
}

/// Per-request configuration: HTTP verb (GET by default), headers, and an
/// optional raw body.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl RequestOptions {
    /// GET with the given headers.
    pub fn get(headers: HeaderMap) -> Self {
        Self {
            method: Method::GET,
            headers,
            body: None,
        }
    }

    /// POST with the given headers and no body.
    pub fn post(headers: HeaderMap) -> Self {
        Self {
            method: Method::POST,
            headers,
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Status code plus body text of a completed exchange.
///
/// The body is kept as text and decoded on demand, so a caller can branch
/// on the status before committing to a JSON shape.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: String) -> Self {
        Self { status, body }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Decodes the body into `T`. A decode failure on a 200 response is
    /// surfaced as [`ClientError::Json`].
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Decodes the body into an untyped JSON value.
    pub fn json_value(&self) -> Result<Value, ClientError> {
        self.json()
    }
}
