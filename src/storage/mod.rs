pub mod json_file;
pub mod memory;
pub mod sqlite;

use crate::error::StorageError;
use crate::models::transaction::{NewTransaction, Transaction, TransactionId};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Durable mirror of the ledger. Implementations assign ids and creation
/// timestamps on insert; everything else is a plain write-through.
pub trait TransactionStore {
    fn load_all(&mut self) -> Result<Vec<Transaction>, StorageError>;
    fn insert(&mut self, record: &NewTransaction) -> Result<Transaction, StorageError>;
    fn update_by_id(&mut self, id: TransactionId, record: &Transaction) -> Result<(), StorageError>;
    fn delete_by_id(&mut self, id: TransactionId) -> Result<(), StorageError>;
}

impl<S: TransactionStore + ?Sized> TransactionStore for Box<S> {
    fn load_all(&mut self) -> Result<Vec<Transaction>, StorageError> {
        (**self).load_all()
    }

    fn insert(&mut self, record: &NewTransaction) -> Result<Transaction, StorageError> {
        (**self).insert(record)
    }

    fn update_by_id(&mut self, id: TransactionId, record: &Transaction) -> Result<(), StorageError> {
        (**self).update_by_id(id, record)
    }

    fn delete_by_id(&mut self, id: TransactionId) -> Result<(), StorageError> {
        (**self).delete_by_id(id)
    }
}
