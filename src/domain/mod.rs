//! Domain types for the client credit ledger.
//!
//! This module provides:
//! - Lossless money handling via the Decimal wrapper
//! - Primitives: ClientId, Operation, Column, ClientCategory
//! - The unified Transaction record plus its write-side shapes
//! - Auxiliary source rows (sales, advances, credits, draw balances)
//! - Deterministic (date, category rank) ordering

pub mod category;
pub mod client;
pub mod decimal;
pub mod ordering;
pub mod primitives;
pub mod source_rows;
pub mod transaction;

pub use category::Category;
pub use client::Client;
pub use decimal::Decimal;
pub use ordering::{sort_transactions, CategoryRank, TransactionOrderingKey};
pub use primitives::{ClientCategory, ClientId, Column, Operation, ParseEnumError};
pub use source_rows::{AdvanceRow, ClientSources, CreditRow, DrawBalanceRow, SaleRow};
pub use transaction::{labels, NewTransaction, Origin, Transaction, TransactionPatch};
