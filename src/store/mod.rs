//! Record store abstraction the ledger reads from and writes to.

use crate::domain::{
    AdvanceRow, Client, ClientId, CreditRow, DrawBalanceRow, NewTransaction, SaleRow, Transaction,
    TransactionPatch,
};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod memory;

pub use memory::MemoryStore;

/// Raw entity access for clients, manual transactions and auxiliary rows.
///
/// Implementations own retry policy; the ledger never retries a failed call.
#[async_trait]
pub trait RecordStore: Send + Sync + fmt::Debug {
    async fn list_clients(&self) -> Result<Vec<Client>, StoreError>;

    async fn get_client(&self, id: &ClientId) -> Result<Option<Client>, StoreError>;

    /// Manual transactions for a client, in store order.
    async fn list_manual_transactions(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<Transaction>, StoreError>;

    async fn list_sales(&self, client_id: &ClientId) -> Result<Vec<SaleRow>, StoreError>;

    async fn list_advances(&self, client_id: &ClientId) -> Result<Vec<AdvanceRow>, StoreError>;

    async fn list_credits(&self, client_id: &ClientId) -> Result<Vec<CreditRow>, StoreError>;

    async fn list_draw_balances(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<DrawBalanceRow>, StoreError>;

    /// Persist a manual transaction and return it with its assigned id.
    async fn create_transaction(&self, tx: NewTransaction) -> Result<Transaction, StoreError>;

    async fn update_transaction(&self, id: &str, patch: &TransactionPatch)
        -> Result<(), StoreError>;

    async fn delete_transaction(&self, id: &str) -> Result<(), StoreError>;
}

/// Error type for record store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("row".to_string()),
            other => StoreError::Database(other.to_string()),
        }
    }
}
