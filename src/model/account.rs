use serde::{Deserialize, Serialize};

use super::transaction::Direction;

/// An account owned by the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<Direction>,
    #[serde(default)]
    pub user_id: String,
}
