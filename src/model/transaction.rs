//! Statement transactions
//!
//! Records are decoded leniently: a transaction with a missing value or an
//! unreadable date is still a transaction, it just contributes less to the
//! derived view-model.

use serde::{Deserialize, Serialize};

use super::category::DEFAULT_CATEGORY;

/// Whether a transaction increases or decreases the account balance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Money coming in
    Credit,
    /// Money going out
    Debit,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Credit => write!(f, "Credit"),
            Direction::Debit => write!(f, "Debit"),
        }
    }
}

/// A single statement entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub account_id: String,
    /// `None` when the backend omitted the type or sent an unknown one
    #[serde(rename = "type", default, deserialize_with = "lenient::direction")]
    pub direction: Option<Direction>,
    /// Signed amount; `None` when missing or not a number
    #[serde(default, deserialize_with = "lenient::number")]
    pub value: Option<f64>,
    /// Raw date string exactly as sent by the backend
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Attachment reference
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub anexo: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Field decoders that never fail: null or wrong-typed input becomes empty.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::Direction;

    fn text(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(text(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(text(Value::deserialize(deserializer)?))
    }

    /// Numbers, or strings holding a plain decimal number
    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn direction<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Direction>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) if s.eq_ignore_ascii_case("credit") => Some(Direction::Credit),
            Value::String(s) if s.eq_ignore_ascii_case("debit") => Some(Direction::Debit),
            _ => None,
        })
    }
}

impl Transaction {
    /// Create a transaction with an explicit direction, value and date
    pub fn new(
        id: impl Into<String>,
        direction: Direction,
        value: f64,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            account_id: String::new(),
            direction: Some(direction),
            value: Some(value),
            date: date.into(),
            from: None,
            to: None,
            anexo: None,
            category: None,
            description: None,
        }
    }

    /// Income of `value`
    pub fn credit(id: impl Into<String>, value: f64, date: impl Into<String>) -> Self {
        Self::new(id, Direction::Credit, value, date)
    }

    /// Expense of `value`; the sign of `value` is ignored
    pub fn debit(id: impl Into<String>, value: f64, date: impl Into<String>) -> Self {
        Self::new(id, Direction::Debit, -value.abs(), date)
    }

    /// Builder method: set the category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Builder method: set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method: set the owning account
    pub fn account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    /// Contribution of this transaction to the balance.
    ///
    /// A negative value is always an expense. A debit with a positive value
    /// is an expense too. Missing or non-finite values contribute nothing.
    pub fn signed_amount(&self) -> Option<f64> {
        let value = self.value.filter(|v| v.is_finite())?;
        if value < 0.0 {
            Some(value)
        } else if self.direction == Some(Direction::Debit) {
            Some(-value)
        } else {
            Some(value)
        }
    }

    /// True when this transaction reduces the balance
    pub fn is_expense(&self) -> bool {
        self.signed_amount().map(|v| v < 0.0).unwrap_or(false)
    }

    /// Category key used for grouping, `outros` when none is set
    pub fn category_key(&self) -> &str {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_amount() {
        assert_eq!(Transaction::credit("1", 100.0, "").signed_amount(), Some(100.0));
        assert_eq!(Transaction::debit("2", 40.0, "").signed_amount(), Some(-40.0));

        // Negative value is an expense regardless of direction
        let t = Transaction::new("3", Direction::Credit, -15.0, "");
        assert_eq!(t.signed_amount(), Some(-15.0));

        // Positive debit is an expense
        let t = Transaction::new("4", Direction::Debit, 15.0, "");
        assert_eq!(t.signed_amount(), Some(-15.0));
        assert!(t.is_expense());
    }

    #[test]
    fn test_missing_value() {
        let mut t = Transaction::credit("1", 10.0, "");
        t.value = None;
        assert_eq!(t.signed_amount(), None);
        assert!(!t.is_expense());

        t.value = Some(f64::NAN);
        assert_eq!(t.signed_amount(), None);
    }

    #[test]
    fn test_category_key_default() {
        let t = Transaction::debit("1", 10.0, "");
        assert_eq!(t.category_key(), "outros");

        let t = Transaction::debit("1", 10.0, "").category("  ");
        assert_eq!(t.category_key(), "outros");

        let t = Transaction::debit("1", 10.0, "").category("lazer");
        assert_eq!(t.category_key(), "lazer");
    }

    #[test]
    fn test_deserialize_backend_record() {
        let json = r#"{
            "id": "t1",
            "accountId": "acc-1",
            "type": "Debit",
            "value": -52.3,
            "date": "2024-05-03T12:00:00.000Z",
            "to": "Mercado",
            "category": "alimentacao"
        }"#;

        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.id, "t1");
        assert_eq!(t.account_id, "acc-1");
        assert_eq!(t.direction, Some(Direction::Debit));
        assert_eq!(t.value, Some(-52.3));
        assert_eq!(t.to.as_deref(), Some("Mercado"));
        assert_eq!(t.category_key(), "alimentacao");
    }

    #[test]
    fn test_deserialize_malformed_fields() {
        let json = r#"[
            {"id": 7, "type": "Transfer", "value": -5, "date": null, "category": "lazer"},
            {"id": "t2", "type": "debit", "value": "12,50", "date": "2024-05-03", "to": 42},
            {"id": "t3", "value": " 10.5 ", "category": null, "anexo": {"file": "x.pdf"}}
        ]"#;

        let transactions: Vec<Transaction> = serde_json::from_str(json).unwrap();
        assert_eq!(transactions.len(), 3);

        let t = &transactions[0];
        assert_eq!(t.id, "7");
        assert_eq!(t.direction, None);
        assert_eq!(t.value, Some(-5.0));
        assert!(t.date.is_empty());
        assert_eq!(t.category_key(), "lazer");
        assert!(t.is_expense());

        let t = &transactions[1];
        assert_eq!(t.direction, Some(Direction::Debit));
        assert_eq!(t.value, None);
        assert_eq!(t.signed_amount(), None);
        assert_eq!(t.to.as_deref(), Some("42"));

        let t = &transactions[2];
        assert_eq!(t.value, Some(10.5));
        assert_eq!(t.category, None);
        assert_eq!(t.anexo, None);
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let t: Transaction = serde_json::from_str(r#"{"id": "t2"}"#).unwrap();
        assert_eq!(t.direction, None);
        assert_eq!(t.value, None);
        assert!(t.date.is_empty());
    }
}
