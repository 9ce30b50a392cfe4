use chrono::Utc;
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

use super::TransactionStore;
use crate::db::{connection, repository};
use crate::error::StorageError;
use crate::models::transaction::{NewTransaction, Transaction, TransactionId};

/// Relational backend on top of a SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        debug!(path = %path.display(), "opening sqlite store");
        Ok(Self {
            conn: connection::establish_connection(path)?,
        })
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            conn: connection::establish_in_memory_connection()?,
        })
    }
}

impl TransactionStore for SqliteStore {
    fn load_all(&mut self) -> Result<Vec<Transaction>, StorageError> {
        repository::get_all_transactions(&self.conn)
    }

    fn insert(&mut self, record: &NewTransaction) -> Result<Transaction, StorageError> {
        let transaction = record.clone().into_transaction(TransactionId::new(), Utc::now());
        repository::add_transaction(&self.conn, &transaction)?;
        Ok(transaction)
    }

    fn update_by_id(&mut self, id: TransactionId, record: &Transaction) -> Result<(), StorageError> {
        if record.id != id {
            return Err(StorageError::Corrupt(format!(
                "record id {} does not match target id {}",
                record.id, id
            )));
        }
        repository::update_transaction(&self.conn, record)
    }

    fn delete_by_id(&mut self, id: TransactionId) -> Result<(), StorageError> {
        repository::remove_transaction(&self.conn, id)
    }
}
