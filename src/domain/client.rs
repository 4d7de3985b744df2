//! Client accounts.

use crate::domain::{ClientCategory, ClientId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    /// Short human identifier; also the key for per-client overrides.
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub category: ClientCategory,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Only paper clients appear on the paper ledger.
    pub fn is_paper(&self) -> bool {
        self.category == ClientCategory::Paper
    }
}
