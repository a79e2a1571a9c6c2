//! Transaction View-Model Builder
//!
//! Derives the presentation-ready structures of the dashboard from a raw
//! transaction list:
//!
//! - **Summary**: income, expenses, balance and count for the summary cards
//! - **Monthly series**: six trailing calendar months of income/expenses
//! - **Category breakdown**: expense totals per category, largest first
//!
//! Building is pure and synchronous. The only input besides the transactions
//! is the instant used to anchor the trailing window. Malformed records are
//! excluded from whichever structure they cannot contribute to; nothing here
//! returns an error.

mod categories;
mod dates;
mod monthly;
mod summary;

pub use categories::{category_breakdown, CategoryTotal};
pub use dates::{month_label, parse_date};
pub use monthly::{empty_series, monthly_series, MonthMatching, MonthlyBucket, TRAILING_MONTHS};
pub use summary::Summary;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Transaction;

/// Everything the presentation layer needs for one render
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardViewModel {
    pub summary: Summary,
    pub monthly: Vec<MonthlyBucket>,
    pub categories: Vec<CategoryTotal>,
    /// Instant the trailing window was anchored to
    pub generated_at: DateTime<Utc>,
}

impl DashboardViewModel {
    /// Zero-valued view-model, used before the first fetch and after a failed one
    pub fn empty(now: DateTime<Utc>, offset: &FixedOffset) -> Self {
        Self {
            summary: Summary::default(),
            monthly: empty_series(now.with_timezone(offset).date_naive()),
            categories: Vec::new(),
            generated_at: now,
        }
    }
}

/// Builds [`DashboardViewModel`]s
#[derive(Debug, Clone, Copy)]
pub struct ViewModelBuilder {
    /// Offset in which calendar months are evaluated
    offset: FixedOffset,
    matching: MonthMatching,
}

impl Default for ViewModelBuilder {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
            matching: MonthMatching::default(),
        }
    }
}

impl ViewModelBuilder {
    pub fn new(offset: FixedOffset, matching: MonthMatching) -> Self {
        Self { offset, matching }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn matching(&self) -> MonthMatching {
        self.matching
    }

    /// Derive the view-model for `transactions` as of `now`
    pub fn build(&self, transactions: &[Transaction], now: DateTime<Utc>) -> DashboardViewModel {
        let anchor = now.with_timezone(&self.offset).date_naive();

        DashboardViewModel {
            summary: Summary::from_transactions(transactions),
            monthly: monthly_series(transactions, anchor, &self.offset, self.matching),
            categories: category_breakdown(transactions),
            generated_at: now,
        }
    }

    /// Zero-valued view-model as of `now`
    pub fn empty(&self, now: DateTime<Utc>) -> DashboardViewModel {
        DashboardViewModel::empty(now, &self.offset)
    }
}
