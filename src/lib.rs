pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod operations;
pub mod storage;

pub use config::{LedgerConfig, StorageBackend, SyncPolicy};
pub use error::{Field, ImportError, LedgerError, StorageError, SyncOutcome};
pub use ledger::TransactionLedger;
pub use models::summary::{CategoryShare, MonthTotals, Totals, WeekdayTotals};
pub use models::transaction::{Category, NewTransaction, Transaction, TransactionId, TransactionType};
pub use storage::{JsonFileStore, MemoryStore, SqliteStore, TransactionStore};
