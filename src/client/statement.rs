//! Account/statement REST client
//!
//! Talks to the backend with the session's bearer token:
//! - `GET /account` to find the user's primary account when none is selected
//! - `GET /account/{id}/statement` for the transaction list

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{ClientError, TransactionSource};
use crate::config::ApiConfig;
use crate::model::{Account, Transaction};
use crate::session::Session;

/// Account/statement REST client
pub struct StatementClient {
    client: Client,
    config: StatementClientConfig,
}

/// Configuration for the statement client
#[derive(Debug, Clone)]
pub struct StatementClientConfig {
    /// Base URL for the API (e.g., "http://localhost:3000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for StatementClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

impl From<&ApiConfig> for StatementClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            request_timeout_ms: config.request_timeout_secs.saturating_mul(1000),
        }
    }
}

impl StatementClient {
    pub fn new(config: StatementClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .user_agent(concat!("bytebank-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// List the accounts of the token's owner
    pub async fn accounts(&self, token: &str) -> Result<Vec<Account>, ClientError> {
        let envelope: ApiEnvelope<AccountResult> = self.get_json(&self.url("/account"), token).await?;
        Ok(envelope.result.map(|r| r.account).unwrap_or_default())
    }

    /// Fetch the statement of one account.
    ///
    /// Malformed fields inside an entry decode as empty. Only entries that are
    /// not JSON objects are logged and skipped.
    pub async fn statement(
        &self,
        token: &str,
        account_id: &str,
    ) -> Result<Vec<Transaction>, ClientError> {
        let path = format!("/account/{}/statement", urlencoding::encode(account_id));
        let envelope: ApiEnvelope<StatementResult> = self.get_json(&self.url(&path), token).await?;

        let raw = envelope.result.map(|r| r.transactions).unwrap_or_default();
        let total = raw.len();

        let transactions: Vec<Transaction> = raw
            .into_iter()
            .filter_map(|value| {
                if !value.is_object() {
                    tracing::warn!(account_id, entry = %value, "Skipping non-object statement entry");
                    return None;
                }
                match serde_json::from_value(value) {
                    Ok(transaction) => Some(transaction),
                    Err(e) => {
                        tracing::warn!(account_id, error = %e, "Skipping undecodable statement entry");
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(
            account_id,
            received = total,
            decoded = transactions.len(),
            "Fetched statement"
        );

        Ok(transactions)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, token: &str) -> Result<T, ClientError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Unauthorized(status.as_u16()));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = response.bytes().await.map_err(ClientError::from_transport)?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl TransactionSource for StatementClient {
    async fn fetch_transactions(&self, session: &Session) -> Result<Vec<Transaction>, ClientError> {
        let token = session
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ClientError::NotAuthenticated)?;

        let account_id = match session.account_id.as_deref() {
            Some(id) => id.to_string(),
            None => self
                .accounts(token)
                .await?
                .into_iter()
                .next()
                .map(|account| account.id)
                .ok_or(ClientError::NoAccount)?,
        };

        self.statement(token, &account_id).await
    }
}

// ============================================
// Response DTOs
// ============================================

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct AccountResult {
    #[serde(default)]
    account: Vec<Account>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    transactions: Vec<serde_json::Value>,
}
