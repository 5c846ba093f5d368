use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;

use crate::client::ClientError;
use crate::config::Credentials;

/// Tokens issued by a successful login.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub jwt_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub feed_token: String,
}

impl Session {
    pub fn new(jwt_token: impl Into<String>) -> Self {
        Self {
            jwt_token: jwt_token.into(),
            refresh_token: String::new(),
            feed_token: String::new(),
        }
    }

    /// Bearer value without any `Bearer ` prefix the broker may include.
    pub fn access_token(&self) -> &str {
        self.jwt_token
            .strip_prefix("Bearer ")
            .unwrap_or(&self.jwt_token)
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("jwt_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("feed_token", &"<redacted>")
            .finish()
    }
}

/// Creates authenticated sessions. Implementations never prompt; the
/// credentials carry either the current TOTP or the seed it is derived from.
pub trait SessionProvider: Send + Sync {
    fn login<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> Pin<Box<dyn Future<Output = Result<Session, ClientError>> + Send + 'a>>;
}
