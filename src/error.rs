use crate::domain::{ClientId, Decimal, Transaction};
use crate::payout::PayoutError;
use crate::store::StoreError;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Invalid payout: {0}")]
    Payout(#[from] PayoutError),
    #[error("Amount must be non-negative, got {0}")]
    InvalidAmount(Decimal),
    #[error("Transaction {0} is derived from source data and cannot be edited")]
    VirtualRecord(String),
    #[error("Transaction {0} does not carry a payout description")]
    NotPayout(String),
    #[error("No reporting week contains {0}")]
    NoReportingWeek(NaiveDate),
    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),
}

/// Outcome of a failed payout save.
///
/// `panel1` is written before `main`, so a failure on the second write leaves
/// the itemized entry in the store. It is returned so the caller can delete or
/// retry without re-reading.
#[derive(Debug, Error)]
pub enum PayoutSaveError {
    #[error("Payout session has no entries")]
    EmptySession,
    #[error("Payout not saved: {0}")]
    NothingWritten(#[source] StoreError),
    #[error("Itemized entry {} saved but main entry failed: {source}", .panel.id)]
    MainWriteFailed {
        panel: Transaction,
        #[source]
        source: StoreError,
    },
}

impl PayoutSaveError {
    /// The transaction left behind by a partial save, if any.
    pub fn orphaned(&self) -> Option<&Transaction> {
        match self {
            PayoutSaveError::MainWriteFailed { panel, .. } => Some(panel),
            _ => None,
        }
    }
}
