//! Typed async client for the Character.AI private web API.
//!
//! The API surface is the [`AccountApi`] facade, which covers account,
//! persona, and voice-override management. It talks to the service through
//! two collaborators: a [`Requester`] (one HTTP round trip per call; the
//! [`ReqwestRequester`] implementation is provided) and an [`AuthSession`]
//! (authorization headers plus the authenticated account id).
//!
//! ```no_run
//! use std::sync::Arc;
//! use charai::{AccountApi, AuthSession, ReqwestRequester};
//!
//! # async fn run() -> Result<(), charai::ClientError> {
//! let session = Arc::new(AuthSession::new("api-token", "12345"));
//! let requester = Arc::new(ReqwestRequester::new(reqwest::Client::new()));
//! let api = AccountApi::new(session, requester)?;
//!
//! let me = api.fetch_me().await?;
//! println!("logged in as {}", me.username);
//! # Ok(())
//! # }
//! ```
//!
//! Every operation is a single request-response exchange (persona edit and
//! delete perform two, sequentially). There is no retry, caching, or
//! pagination; timeouts belong to the `reqwest::Client` the requester wraps.

pub mod account;
pub mod error;
pub mod requester;
pub mod session;

pub use account::{Account, AccountApi, Avatar, CharacterShort, Persona, Voice, VoiceCreator};
pub use error::ClientError;
pub use requester::{ApiResponse, RequestOptions, Requester, ReqwestRequester};
pub use session::AuthSession;
