//! Core data types for the dashboard
//!
//! - `Transaction`: a single statement entry as returned by the backend
//! - `Direction`: credit (income) or debit (expense)
//! - `Category`: the known expense/income categories and their display metadata
//! - `Account`: an account owned by the signed-in user

mod account;
mod category;
mod transaction;

pub use account::Account;
pub use category::{Category, DEFAULT_CATEGORY};
pub use transaction::{Direction, Transaction};
