use serde::{Deserialize, Serialize};

use crate::model::Transaction;

/// Aggregate totals shown on the summary cards
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub income: f64,
    pub expenses: f64,
    /// Always `income - expenses`
    pub balance: f64,
    pub count: usize,
}

impl Summary {
    /// Reduce a transaction list into totals.
    ///
    /// Every record is counted, including those without a usable value.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut income = 0.0;
        let mut expenses = 0.0;

        for amount in transactions.iter().filter_map(Transaction::signed_amount) {
            if amount > 0.0 {
                income += amount;
            } else {
                expenses += amount.abs();
            }
        }

        Self {
            income,
            expenses,
            balance: income - expenses,
            count: transactions.len(),
        }
    }
}
