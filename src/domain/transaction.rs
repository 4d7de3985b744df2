//! The unified ledger record and its write-side shapes.

use crate::domain::{ClientId, Column, Decimal, Operation};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Labels the engine stamps on the transactions it produces.
pub mod labels {
    pub const SALES_OPENING: &str = "Sales Opening";
    pub const CASH_ADVANCE: &str = "Cash Advance";
    pub const CASH_CREDIT: &str = "Cash Credit";
    pub const PREVIOUS_BALANCE: &str = "Previous Balance";
    /// Label for both halves of a saved payout.
    pub const WIN_SETTLEMENT: &str = "Win Settlement";
}

/// Where a transaction came from, recovered from its source-tagged id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Manual,
    Sale,
    /// Several sale rows merged for one reporting window.
    SaleAggregate,
    Advance,
    Credit,
    DrawBalance,
}

impl Origin {
    const TAGGED: [Origin; 5] = [
        Origin::SaleAggregate,
        Origin::Sale,
        Origin::Advance,
        Origin::Credit,
        Origin::DrawBalance,
    ];

    /// Id prefix for virtual origins; manual ids carry no tag.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Origin::Manual => None,
            Origin::Sale => Some("sale"),
            Origin::SaleAggregate => Some("sale-agg"),
            Origin::Advance => Some("adv"),
            Origin::Credit => Some("cred"),
            Origin::DrawBalance => Some("draw"),
        }
    }

    pub fn from_id(id: &str) -> Origin {
        let Some((prefix, _)) = id.split_once(':') else {
            return Origin::Manual;
        };
        Self::TAGGED
            .into_iter()
            .find(|origin| origin.tag() == Some(prefix))
            .unwrap_or(Origin::Manual)
    }

    pub fn is_virtual(&self) -> bool {
        !matches!(self, Origin::Manual)
    }

    /// Stable id for a virtual record derived from its source identity.
    ///
    /// SHA-256 over length-prefixed parts, truncated to 128 bits and hex
    /// encoded, so repeated synthesis of the same row yields the same id.
    pub fn virtual_id<'a>(&self, parts: impl IntoIterator<Item = &'a str>) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update((part.len() as u32).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        let hash = hasher.finalize();
        let tag = self.tag().unwrap_or("manual");
        format!("{}:{}", tag, hex::encode(&hash[..16]))
    }
}

/// A single ledger record, manual or synthesized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub client_id: ClientId,
    pub date: NaiveDate,
    pub description: String,
    pub category_label: String,
    /// Non-negative magnitude; the sign lives in `operation`.
    pub amount: Decimal,
    pub operation: Operation,
    #[serde(default)]
    pub column: Column,
    pub is_visible: bool,
}

impl Transaction {
    /// Signed contribution to the balance.
    pub fn net_effect(&self) -> Decimal {
        self.operation.apply(self.amount)
    }

    pub fn origin(&self) -> Origin {
        Origin::from_id(&self.id)
    }

    pub fn is_sale(&self) -> bool {
        matches!(self.origin(), Origin::Sale | Origin::SaleAggregate)
    }

    pub fn apply_patch(&mut self, patch: &TransactionPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(label) = &patch.category_label {
            self.category_label = label.clone();
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(operation) = patch.operation {
            self.operation = operation;
        }
        if let Some(column) = patch.column {
            self.column = column;
        }
        if let Some(is_visible) = patch.is_visible {
            self.is_visible = is_visible;
        }
    }
}

/// A manual transaction before the store assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub client_id: ClientId,
    pub date: NaiveDate,
    pub description: String,
    pub category_label: String,
    pub amount: Decimal,
    pub operation: Operation,
    #[serde(default)]
    pub column: Column,
    pub is_visible: bool,
}

impl NewTransaction {
    /// Visible entry in the `main` column with an empty description.
    pub fn new(
        client_id: ClientId,
        date: NaiveDate,
        category_label: impl Into<String>,
        amount: Decimal,
        operation: Operation,
    ) -> Self {
        NewTransaction {
            client_id,
            date,
            description: String::new(),
            category_label: category_label.into(),
            amount,
            operation,
            column: Column::Main,
            is_visible: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn in_column(mut self, column: Column) -> Self {
        self.column = column;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_visible = false;
        self
    }

    pub fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            client_id: self.client_id,
            date: self.date,
            description: self.description,
            category_label: self.category_label,
            amount: self.amount,
            operation: self.operation,
            column: self.column,
            is_visible: self.is_visible,
        }
    }
}

/// Partial update of a stored manual transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category_label: Option<String>,
    pub amount: Option<Decimal>,
    pub operation: Option<Operation>,
    pub column: Option<Column>,
    pub is_visible: Option<bool>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == TransactionPatch::default()
    }
}
