//! SQLite persistence for the ledger.
//!
//! - Database initialization and schema migrations
//! - `SqliteStore`, the `RecordStore` implementation over sqlx

pub mod migrations;
pub mod store;

pub use migrations::init_db;
pub use store::SqliteStore;
