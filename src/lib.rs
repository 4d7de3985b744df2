pub mod categories;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod payout;
pub mod store;

pub use categories::{CategoryError, CategoryRegistry};
pub use config::Config;
pub use db::{init_db, SqliteStore};
pub use domain::{
    Client, ClientCategory, ClientId, Column, Decimal, NewTransaction, Operation, Transaction,
    TransactionPatch,
};
pub use engine::{BalanceCalculator, ClientBalances, ColumnView, LedgerWindow, WeekCalendar};
pub use error::{LedgerError, PayoutSaveError};
pub use orchestration::LedgerService;
pub use payout::{BetRequest, PayoutError, PayoutSession, WinningEntry};
pub use store::{MemoryStore, RecordStore, StoreError};
