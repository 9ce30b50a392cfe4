use std::fmt;
use std::io;

use thiserror::Error;

use crate::models::transaction::TransactionId;

/// The transaction field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Description,
    Amount,
    Type,
    Category,
    Date,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Id => "id",
            Field::Description => "description",
            Field::Amount => "amount",
            Field::Type => "type",
            Field::Category => "category",
            Field::Date => "date",
        };
        f.write_str(name)
    }
}

/// What happened to the in-memory collection when the store failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The change is visible in the ledger but the store does not have it.
    CommittedLocally,
    /// The ledger is unchanged.
    NotApplied,
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::CommittedLocally => f.write_str("kept locally, store out of sync"),
            SyncOutcome::NotApplied => f.write_str("change not applied"),
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt record: {0}")]
    Corrupt(String),
    #[error("no stored row for transaction {0}")]
    MissingRow(TransactionId),
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: Field, reason: String },
    #[error("transaction {0} not found")]
    NotFound(TransactionId),
    #[error("persistence failure ({outcome}): {source}")]
    Persistence {
        outcome: SyncOutcome,
        #[source]
        source: StorageError,
    },
}

impl LedgerError {
    pub fn invalid(field: Field, reason: impl Into<String>) -> Self {
        LedgerError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn invalid_field(&self) -> Option<Field> {
        match self {
            LedgerError::InvalidInput { field, .. } => Some(*field),
            _ => None,
        }
    }

    pub fn sync_outcome(&self) -> Option<SyncOutcome> {
        match self {
            LedgerError::Persistence { outcome, .. } => Some(*outcome),
            _ => None,
        }
    }
}

/// Failures while importing a CSV file. Line numbers are 1-based.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to open file '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("CSV parse error on line {line}: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },
    #[error("invalid number of columns on line {line}: expected 5, got {found}")]
    Columns { line: usize, found: usize },
    #[error("line {line}: {source}")]
    Rejected {
        line: usize,
        #[source]
        source: LedgerError,
    },
}

impl ImportError {
    pub fn line(&self) -> Option<usize> {
        match self {
            ImportError::Open { .. } => None,
            ImportError::Csv { line, .. }
            | ImportError::Columns { line, .. }
            | ImportError::Rejected { line, .. } => Some(*line),
        }
    }
}
