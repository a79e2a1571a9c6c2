//! Transaction sources
//!
//! The dashboard pulls its transactions through the [`TransactionSource`]
//! trait. [`StatementClient`] is the HTTP implementation backed by the
//! account/statement service.

mod statement;

pub use statement::{StatementClient, StatementClientConfig};

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Transaction;
use crate::session::Session;

/// Anything that can list the transactions of the session's account
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch_transactions(&self, session: &Session) -> Result<Vec<Transaction>, ClientError>;
}

/// Errors that can occur when fetching transactions
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("No account available for this user")]
    NoAccount,

    #[error("Session rejected by the server ({0})")]
    Unauthorized(u16),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Service unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Classify a transport error the same way for every request
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ClientError::Timeout
        } else if error.is_connect() {
            ClientError::Unavailable
        } else {
            ClientError::Request(error)
        }
    }
}
