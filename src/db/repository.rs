use crate::error::StorageError;
use crate::models::transaction::{Category, Transaction, TransactionId, TransactionType};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use std::str::FromStr;

const SELECT_COLUMNS: &str =
    "SELECT id, date, description, amount, transaction_type, category, created_at FROM transactions";

pub fn add_transaction(conn: &Connection, transaction: &Transaction) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO transactions (id, date, description, amount, transaction_type, category, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            transaction.id.to_string(),
            transaction.date.to_string(),
            &transaction.description,
            transaction.amount.to_string(),
            transaction.transaction_type.as_str(),
            transaction.category.as_str(),
            format_timestamp(&transaction.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_all_transactions(conn: &Connection) -> Result<Vec<Transaction>, StorageError> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY created_at DESC", SELECT_COLUMNS))?;
    let transaction_iter = stmt.query_map([], row_to_transaction)?;

    let mut transactions = Vec::new();
    for transaction in transaction_iter {
        transactions.push(transaction?);
    }
    Ok(transactions)
}

/// Replaces every mutable column. `created_at` is never rewritten.
pub fn update_transaction(conn: &Connection, transaction: &Transaction) -> Result<(), StorageError> {
    let rows_affected = conn.execute(
        "UPDATE transactions SET date = ?2, description = ?3, amount = ?4, transaction_type = ?5, category = ?6 WHERE id = ?1",
        rusqlite::params![
            transaction.id.to_string(),
            transaction.date.to_string(),
            &transaction.description,
            transaction.amount.to_string(),
            transaction.transaction_type.as_str(),
            transaction.category.as_str(),
        ],
    )?;

    if rows_affected == 0 {
        return Err(StorageError::MissingRow(transaction.id));
    }
    Ok(())
}

pub fn remove_transaction(conn: &Connection, id: TransactionId) -> Result<(), StorageError> {
    let rows_affected = conn.execute("DELETE FROM transactions WHERE id = ?1", [id.to_string()])?;

    if rows_affected == 0 {
        return Err(StorageError::MissingRow(id));
    }
    Ok(())
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let id_str: String = row.get(0)?;
    let date_str: String = row.get(1)?;
    let amount_str: String = row.get(3)?;
    let transaction_type_str: String = row.get(4)?;
    let category_str: String = row.get(5)?;
    let created_at_str: String = row.get(6)?;

    Ok(Transaction {
        id: TransactionId::from_str(&id_str).map_err(|e| conversion_error(0, e))?,
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| conversion_error(1, e))?,
        description: row.get(2)?,
        amount: Decimal::from_str(&amount_str).map_err(|e| conversion_error(3, e))?,
        transaction_type: match transaction_type_str.to_lowercase().as_str() {
            "income" => TransactionType::Income,
            "expense" => TransactionType::Expense,
            other => {
                return Err(conversion_error(
                    4,
                    StorageError::Corrupt(format!("invalid transaction type '{}'", other)),
                ));
            }
        },
        category: Category::from(category_str),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| conversion_error(6, e))?
            .with_timezone(&Utc),
    })
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}
