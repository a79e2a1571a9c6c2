//! Session context
//!
//! The authenticated session (token, user, selected account) is supplied by
//! the host and handed to the dashboard explicitly. Updates are delivered to
//! subscribers through a watch channel.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Greeting name used when nothing better is known
pub const FALLBACK_USER_NAME: &str = "Usuário";

/// Signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Snapshot of the authentication state
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    /// Selected account; when unset the first account of the user is used
    pub account_id: Option<String>,
}

#[derive(Deserialize)]
struct TokenClaims {
    username: Option<String>,
}

impl Session {
    /// Session holding only a bearer token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Builder method: select an account
    pub fn account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Builder method: set the user
    pub fn user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().map(|t| !t.is_empty()).unwrap_or(false)
    }

    /// Name used in the greeting.
    ///
    /// Prefers the session user, then the `username` claim of the token
    /// payload, then [`FALLBACK_USER_NAME`].
    pub fn display_name(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.username.clone())
            .filter(|name| !name.is_empty())
            .or_else(|| self.token.as_deref().and_then(username_from_token))
            .unwrap_or_else(|| FALLBACK_USER_NAME.to_string())
    }
}

/// Read the `username` claim from a JWT without verifying it
fn username_from_token(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .ok()?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;
    claims.username.filter(|name| !name.is_empty())
}

/// Shared, observable session state
pub struct SessionContext {
    tx: watch::Sender<Session>,
}

impl SessionContext {
    pub fn new(initial: Session) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Current session
    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Replace the session and notify subscribers
    pub fn set(&self, session: Session) {
        tracing::debug!(
            authenticated = session.is_authenticated(),
            account_id = ?session.account_id,
            "Session updated"
        );
        self.tx.send_replace(session);
    }

    /// Drop credentials
    pub fn sign_out(&self) {
        self.set(Session::default());
    }

    /// Receiver notified on every session change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(Session::default())
    }
}
