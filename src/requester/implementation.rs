use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use url::Url;

use super::interface::{ApiResponse, RequestOptions, Requester};
use crate::error::ClientError;

/// [`Requester`] backed by a `reqwest::Client`.
///
/// The wrapped client owns connection pooling, TLS, and timeout policy;
/// configure those when building it.
pub struct ReqwestRequester {
    client: ReqwestClient,
}

impl ReqwestRequester {
    pub fn new(client: ReqwestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Requester for ReqwestRequester {
    async fn request(&self, url: Url, options: RequestOptions) -> Result<ApiResponse, ClientError> {
        let RequestOptions {
            method,
            headers,
            body,
        } = options;

        tracing::debug!(target: "charai::requester", %url, %method, has_body = body.is_some(), "dispatching request");

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::trace!(target: "charai::requester", %status, body_len = body.len(), "response received");
        Ok(ApiResponse::new(status, body))
    }
}
