//! Trailing six-month income/expense series

use chrono::{Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::dates::{month_label, months_before, parse_date};
use crate::model::Transaction;

/// Number of calendar months in the trend window, current month included
pub const TRAILING_MONTHS: u32 = 6;

/// How a transaction's month is matched against the window
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MonthMatching {
    /// Compare the short month label only. A transaction from an earlier
    /// year whose month shares a label with a window month lands in it.
    #[default]
    Label,
    /// Compare calendar year and month
    YearMonth,
}

/// Income and expense totals for one calendar month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyBucket {
    /// Short month label, e.g. `mai.`
    pub month: String,
    pub year: i32,
    pub month_number: u32,
    pub income: f64,
    pub expenses: f64,
}

impl MonthlyBucket {
    fn empty(year: i32, month_number: u32) -> Self {
        Self {
            month: month_label(month_number).to_string(),
            year,
            month_number,
            income: 0.0,
            expenses: 0.0,
        }
    }

    fn matches(&self, date: NaiveDate, matching: MonthMatching) -> bool {
        match matching {
            MonthMatching::Label => self.month == month_label(date.month()),
            MonthMatching::YearMonth => {
                self.year == date.year() && self.month_number == date.month()
            }
        }
    }
}

/// Zero-valued buckets for the window ending at `anchor`'s month, oldest first
pub fn empty_series(anchor: NaiveDate) -> Vec<MonthlyBucket> {
    (0..TRAILING_MONTHS)
        .rev()
        .map(|back| {
            let (year, month) = months_before(anchor.year(), anchor.month(), back);
            MonthlyBucket::empty(year, month)
        })
        .collect()
}

/// Build the six-month series.
///
/// Transactions without a value or with an unparseable date are skipped, as
/// are those falling outside the window.
pub fn monthly_series(
    transactions: &[Transaction],
    anchor: NaiveDate,
    offset: &FixedOffset,
    matching: MonthMatching,
) -> Vec<MonthlyBucket> {
    let mut buckets = empty_series(anchor);
    let mut skipped = 0usize;

    for transaction in transactions {
        let Some(amount) = transaction.signed_amount() else {
            skipped += 1;
            continue;
        };
        let Some(date) = parse_date(&transaction.date, offset) else {
            tracing::debug!(
                transaction_id = %transaction.id,
                date = %transaction.date,
                "Unparseable transaction date, excluded from monthly series"
            );
            skipped += 1;
            continue;
        };

        if let Some(bucket) = buckets.iter_mut().find(|b| b.matches(date, matching)) {
            if amount > 0.0 {
                bucket.income += amount;
            } else {
                bucket.expenses += amount.abs();
            }
        }
    }

    if skipped > 0 {
        tracing::trace!(skipped, "Monthly series skipped malformed transactions");
    }

    buckets
}
