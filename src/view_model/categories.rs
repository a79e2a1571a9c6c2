//! Expense breakdown by category

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::Transaction;

/// Total expenses for one category key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    /// Sum of absolute expense values, never negative
    pub total: f64,
}

/// Sum expenses per category, largest first.
///
/// Ties keep the order in which categories were first encountered.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions {
        let Some(amount) = transaction.signed_amount().filter(|v| *v < 0.0) else {
            continue;
        };
        let key = transaction.category_key();

        let position = *index.entry(key).or_insert_with(|| {
            totals.push(CategoryTotal {
                category: key.to_string(),
                total: 0.0,
            });
            totals.len() - 1
        });
        totals[position].total += amount.abs();
    }

    // sort_by is stable, so equal totals stay in encounter order
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(category_breakdown(&[]).is_empty());
    }

    #[test]
    fn test_only_expenses_counted() {
        let transactions = vec![
            Transaction::credit("1", 1000.0, "").category("salario"),
            Transaction::debit("2", 40.0, "").category("alimentacao"),
        ];

        let breakdown = category_breakdown(&transactions);
        assert_eq!(
            breakdown,
            vec![CategoryTotal {
                category: "alimentacao".to_string(),
                total: 40.0
            }]
        );
    }

    #[test]
    fn test_sorted_descending_with_default_bucket() {
        let transactions = vec![
            Transaction::debit("1", 10.0, "").category("lazer"),
            Transaction::debit("2", 30.0, ""),
            Transaction::debit("3", 25.0, "").category("lazer"),
            Transaction::debit("4", 5.0, "").category("transporte"),
        ];

        let breakdown = category_breakdown(&transactions);
        let keys: Vec<_> = breakdown.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(keys, vec!["lazer", "outros", "transporte"]);
        assert_eq!(breakdown[0].total, 35.0);

        for pair in breakdown.windows(2) {
            assert!(pair[0].total >= pair[1].total);
        }
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let transactions = vec![
            Transaction::debit("1", 20.0, "").category("saude"),
            Transaction::debit("2", 20.0, "").category("compras"),
            Transaction::debit("3", 20.0, "").category("moradia"),
        ];

        let keys: Vec<_> = category_breakdown(&transactions)
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(keys, vec!["saude", "compras", "moradia"]);
    }

    #[test]
    fn test_date_independent() {
        let transactions = vec![Transaction::debit("1", 12.0, "garbage").category("lazer")];
        assert_eq!(category_breakdown(&transactions)[0].total, 12.0);
    }
}
