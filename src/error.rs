use thiserror::Error;

/// Error type shared by every operation in this crate.
///
/// The first four variants are produced by the requester layer. The rest
/// form the operation taxonomy: each names the operation that failed and,
/// where the server supplied one, carries its error text. Transport
/// failures and application-level rejections surface as the same
/// operation variant; callers cannot tell them apart.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid authorization header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    /// A fetch operation did not produce the expected resource.
    #[error("cannot fetch {resource}")]
    Fetch { resource: &'static str },

    /// An edit was rejected; `detail` is the server's status text, if any.
    #[error("cannot edit {what}. {detail}")]
    Edit { what: &'static str, detail: String },

    /// The settings read-modify-write did not complete.
    #[error("cannot update account settings")]
    Update,

    #[error("cannot create persona. {detail}")]
    Create { detail: String },

    #[error("cannot delete persona. {detail}")]
    Delete { detail: String },

    /// A set/unset operation failed; the inner cause is discarded (see
    /// `AccountApi` docs).
    #[error("cannot set {what}")]
    Set { what: &'static str },

    /// Client-side validation failure. Raised before any network call and
    /// never wraps a network cause.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ClientError {
    pub(crate) fn fetch(resource: &'static str) -> Self {
        ClientError::Fetch { resource }
    }

    pub(crate) fn edit(what: &'static str, detail: impl Into<String>) -> Self {
        ClientError::Edit {
            what,
            detail: detail.into(),
        }
    }

    pub(crate) fn create(detail: impl Into<String>) -> Self {
        ClientError::Create {
            detail: detail.into(),
        }
    }

    pub(crate) fn delete(detail: impl Into<String>) -> Self {
        ClientError::Delete {
            detail: detail.into(),
        }
    }

    pub(crate) fn set(what: &'static str) -> Self {
        ClientError::Set { what }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        ClientError::InvalidArgument(message.into())
    }
}
