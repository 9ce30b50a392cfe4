use chrono::Utc;

use super::TransactionStore;
use crate::error::StorageError;
use crate::models::transaction::{NewTransaction, Transaction, TransactionId};

/// Non-durable store. Everything is lost when the session ends.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    rows: Vec<Transaction>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Transaction>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }
}

impl TransactionStore for MemoryStore {
    fn load_all(&mut self) -> Result<Vec<Transaction>, StorageError> {
        Ok(self.rows.clone())
    }

    fn insert(&mut self, record: &NewTransaction) -> Result<Transaction, StorageError> {
        let transaction = record.clone().into_transaction(TransactionId::new(), Utc::now());
        self.rows.push(transaction.clone());
        Ok(transaction)
    }

    fn update_by_id(&mut self, id: TransactionId, record: &Transaction) -> Result<(), StorageError> {
        if record.id != id {
            return Err(StorageError::Corrupt(format!(
                "record id {} does not match target id {}",
                record.id, id
            )));
        }
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(StorageError::MissingRow(id))?;
        *row = record.clone();
        Ok(())
    }

    fn delete_by_id(&mut self, id: TransactionId) -> Result<(), StorageError> {
        let pos = self
            .rows
            .iter()
            .position(|row| row.id == id)
            .ok_or(StorageError::MissingRow(id))?;
        self.rows.remove(pos);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::{Category, TransactionType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn create_test_draft() -> NewTransaction {
        NewTransaction::new(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            "Rent",
            Decimal::new(90000, 2),
            TransactionType::Expense,
            Category::Home,
        )
    }

    #[test]
    fn test_insert_assigns_unique_ids() {
        let mut store = MemoryStore::new();
        let first = store.insert(&create_test_draft()).unwrap();
        let second = store.insert(&create_test_draft()).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_update_missing_row() {
        let mut store = MemoryStore::new();
        let transaction = create_test_draft().into_transaction(TransactionId::new(), Utc::now());
        let result = store.update_by_id(transaction.id, &transaction);
        assert!(matches!(result, Err(StorageError::MissingRow(id)) if id == transaction.id));
    }

    #[test]
    fn test_update_rejects_mismatched_record_id() {
        let mut store = MemoryStore::new();
        let stored = store.insert(&create_test_draft()).unwrap();
        let mut other = stored.clone();
        other.id = TransactionId::new();
        other.amount = Decimal::ONE;

        let result = store.update_by_id(stored.id, &other);
        assert!(matches!(result, Err(StorageError::Corrupt(_))));
        assert_eq!(store.rows(), &[stored]);
    }

    #[test]
    fn test_delete_removes_row() {
        let mut store = MemoryStore::new();
        let stored = store.insert(&create_test_draft()).unwrap();
        store.delete_by_id(stored.id).unwrap();
        assert!(store.rows().is_empty());
        assert!(store.delete_by_id(stored.id).is_err());
    }
}
