//! Rows owned by the auxiliary subsystems, read-only to the ledger.

use crate::domain::{ClientId, Decimal};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sales for one day, split into the four stake buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRow {
    pub id: String,
    pub client_id: ClientId,
    pub date: NaiveDate,
    pub b: Decimal,
    pub s: Decimal,
    pub a: Decimal,
    pub c: Decimal,
}

impl SaleRow {
    pub fn total(&self) -> Decimal {
        self.b + self.s + self.a + self.c
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceRow {
    pub id: String,
    pub client_id: ClientId,
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditRow {
    pub id: String,
    pub client_id: ClientId,
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// Signed balance carried over from a prior draw period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawBalanceRow {
    pub id: String,
    pub client_id: ClientId,
    pub date: NaiveDate,
    pub balance: Decimal,
}

/// Everything the store holds for one client, read in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSources {
    pub manual: Vec<crate::domain::Transaction>,
    pub sales: Vec<SaleRow>,
    pub advances: Vec<AdvanceRow>,
    pub credits: Vec<CreditRow>,
    pub draw_balances: Vec<DrawBalanceRow>,
}
