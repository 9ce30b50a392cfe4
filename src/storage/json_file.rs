use chrono::Utc;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::TransactionStore;
use crate::error::StorageError;
use crate::models::transaction::{NewTransaction, Transaction, TransactionId};

const TMP_SUFFIX: &str = "tmp";

/// Local durable storage: the whole collection as one JSON array, rewritten
/// on every mutation.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Vec<Transaction>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn write(&self, rows: &[Transaction]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(rows)?;
        write_atomic(&self.path, &json)?;
        debug!(path = %self.path.display(), rows = rows.len(), "wrote json store");
        Ok(())
    }
}

impl TransactionStore for JsonFileStore {
    fn load_all(&mut self) -> Result<Vec<Transaction>, StorageError> {
        self.read()
    }

    fn insert(&mut self, record: &NewTransaction) -> Result<Transaction, StorageError> {
        let mut rows = self.read()?;
        let transaction = record.clone().into_transaction(TransactionId::new(), Utc::now());
        rows.push(transaction.clone());
        self.write(&rows)?;
        Ok(transaction)
    }

    fn update_by_id(&mut self, id: TransactionId, record: &Transaction) -> Result<(), StorageError> {
        if record.id != id {
            return Err(StorageError::Corrupt(format!(
                "record id {} does not match target id {}",
                record.id, id
            )));
        }
        let mut rows = self.read()?;
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(StorageError::MissingRow(id))?;
        *row = record.clone();
        self.write(&rows)
    }

    fn delete_by_id(&mut self, id: TransactionId) -> Result<(), StorageError> {
        let mut rows = self.read()?;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(StorageError::MissingRow(id));
        }
        self.write(&rows)
    }
}

/// Appends the temp suffix so `ledger.json` stages in `ledger.json.tmp`.
fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let staged = tmp_path(path);
    let mut file = File::create(&staged)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&staged, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::{Category, TransactionType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn create_test_draft(description: &str) -> NewTransaction {
        NewTransaction::new(
            NaiveDate::from_ymd_opt(2025, 4, 3).unwrap(),
            description,
            Decimal::new(320000, 2),
            TransactionType::Income,
            Category::Salary,
        )
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("ledger.json"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_insert_update_delete_persist_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ledger.json");
        let mut store = JsonFileStore::new(&path);

        let stored = store.insert(&create_test_draft("April salary")).unwrap();
        let mut changed = stored.clone();
        changed.amount = Decimal::new(330000, 2);
        store.update_by_id(stored.id, &changed).unwrap();

        let mut reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load_all().unwrap(), vec![changed]);

        reopened.delete_by_id(stored.id).unwrap();
        assert!(JsonFileStore::new(&path).load_all().unwrap().is_empty());
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_update_rejects_mismatched_record_id() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("ledger.json"));
        let stored = store.insert(&create_test_draft("Salary")).unwrap();
        let mut other = stored.clone();
        other.id = TransactionId::new();

        let result = store.update_by_id(stored.id, &other);
        assert!(matches!(result, Err(StorageError::Corrupt(_))));
        assert_eq!(store.load_all().unwrap(), vec![stored]);
    }

    #[test]
    fn test_delete_unknown_id() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("ledger.json"));
        store.insert(&create_test_draft("Salary")).unwrap();

        let result = store.delete_by_id(TransactionId::new());
        assert!(matches!(result, Err(StorageError::MissingRow(_))));
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_tmp_path_appends_suffix() {
        assert_eq!(tmp_path(Path::new("data/ledger.json")), Path::new("data/ledger.json.tmp"));
        assert_eq!(tmp_path(Path::new("ledger")), Path::new("ledger.tmp"));
        assert_eq!(tmp_path(Path::new("backup.tmp")), Path::new("backup.tmp.tmp"));
    }

    #[test]
    fn test_data_file_with_tmp_extension_survives_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.tmp");
        let mut store = JsonFileStore::new(&path);
        let first = store.insert(&create_test_draft("Salary")).unwrap();
        let second = store.insert(&create_test_draft("Bonus")).unwrap();

        let rows = JsonFileStore::new(&path).load_all().unwrap();
        assert_eq!(rows, vec![first, second]);
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "{not json").unwrap();

        let mut store = JsonFileStore::new(&path);
        assert!(matches!(store.load_all(), Err(StorageError::Json(_))));
    }
}
