//! # Bytebank Dashboard
//!
//! Personal finance dashboard core: fetches an account statement on behalf of
//! an authenticated session and turns it into presentation-ready data.
//!
//! ## Features
//!
//! - **Summary cards**: income, expenses, balance and transaction count
//! - **Monthly trend**: six trailing calendar months of income and expenses
//! - **Category breakdown**: expenses per category, largest first
//! - **Live refresh**: recompute on refresh events with stale-response protection
//!
//! ## Modules
//!
//! - [`view_model`]: Pure view-model builder
//! - [`client`]: Account/statement service client
//! - [`dashboard`]: Fetch/rebuild controller
//! - [`refresh`]: Refresh event hub
//! - [`session`]: Explicit session context
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bytebank_dashboard::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     config.validate()?;
//!
//!     let client = StatementClient::new(StatementClientConfig::from(&config.api))?;
//!     let session = Arc::new(SessionContext::new(Session::with_token("jwt")));
//!     let dashboard = Dashboard::new(Arc::new(client), session, config.dashboard.builder()?);
//!
//!     dashboard.refresh().await;
//!     println!("{}", render_text(&dashboard.snapshot(), 5));
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod dashboard;
pub mod model;
pub mod refresh;
pub mod render;
pub mod session;
pub mod view_model;

// Re-export top-level types for convenience
pub use model::{Account, Category, Direction, Transaction, DEFAULT_CATEGORY};

pub use view_model::{
    CategoryTotal, DashboardViewModel, MonthMatching, MonthlyBucket, Summary, ViewModelBuilder,
    TRAILING_MONTHS,
};

pub use client::{ClientError, StatementClient, StatementClientConfig, TransactionSource};

pub use dashboard::{Dashboard, DashboardState, RefreshOutcome};

pub use refresh::{HubConfig, RefreshEvent, RefreshHub, REFRESH_EVENT_NAME};

pub use session::{Session, SessionContext, User};

pub use render::{format_brl, render_json, render_text, OutputFormat};

pub use config::{
    ApiConfig, Config, ConfigError, DashboardConfig, LoggingConfig, RemotesConfig,
};
