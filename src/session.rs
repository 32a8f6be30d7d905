use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};

use crate::error::ClientError;

/// Authentication context for the web API: the session token and the id of
/// the account it belongs to.
///
/// The token is held in a [`SecretString`] so it never shows up in `Debug`
/// output or logs. `AuthSession` is immutable after construction; wrap it
/// in an `Arc` to share it between facades.
#[derive(Debug)]
pub struct AuthSession {
    token: SecretString,
    account_id: String,
}

impl AuthSession {
    pub fn new(token: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            account_id: account_id.into(),
        }
    }

    /// Headers for an authenticated JSON request.
    pub fn headers(&self) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        let token = format!("Token {}", self.token.expose_secret());
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&token)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}
