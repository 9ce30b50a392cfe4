use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::error::StorageError;
use crate::storage::{JsonFileStore, MemoryStore, SqliteStore, TransactionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    /// Keep transactions in memory only
    Memory,
    /// JSON document on local disk
    Json,
    /// SQLite database
    Sqlite,
}

impl StorageBackend {
    fn default_path(self) -> Option<PathBuf> {
        match self {
            StorageBackend::Memory => None,
            StorageBackend::Json => Some(PathBuf::from("ledger.json")),
            StorageBackend::Sqlite => Some(PathBuf::from("ledger.db")),
        }
    }
}

/// What the ledger does with its in-memory state when a store write fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SyncPolicy {
    /// Undo the change so ledger and store agree
    #[default]
    Rollback,
    /// Keep the change in memory and flag the ledger as out of sync
    KeepLocal,
}

#[derive(Debug, Clone, Args)]
pub struct LedgerConfig {
    /// Where transactions are persisted
    #[arg(long, value_enum, env = "LEDGER_BACKEND", default_value = "json")]
    pub backend: StorageBackend,

    /// Data file for the json and sqlite backends
    #[arg(long, env = "LEDGER_DATA")]
    pub data: Option<PathBuf>,

    /// Behaviour when the store rejects a write
    #[arg(long, value_enum, env = "LEDGER_SYNC_POLICY", default_value = "rollback")]
    pub sync_policy: SyncPolicy,
}

impl LedgerConfig {
    pub fn new(backend: StorageBackend) -> Self {
        Self {
            backend,
            data: None,
            sync_policy: SyncPolicy::default(),
        }
    }

    pub fn data_path(&self) -> Option<PathBuf> {
        match self.backend {
            StorageBackend::Memory => None,
            backend => self.data.clone().or_else(|| backend.default_path()),
        }
    }

    pub fn open_store(&self) -> Result<Box<dyn TransactionStore>, StorageError> {
        let store: Box<dyn TransactionStore> = match (self.backend, self.data_path()) {
            (StorageBackend::Json, Some(path)) => Box::new(JsonFileStore::new(path)),
            (StorageBackend::Sqlite, Some(path)) => Box::new(SqliteStore::open(&path)?),
            _ => Box::new(MemoryStore::new()),
        };
        Ok(store)
    }
}
