use rusqlite::{Connection, Result};
use std::path::Path;

const CREATE_TRANSACTIONS: &str = "CREATE TABLE IF NOT EXISTS transactions (
    id TEXT PRIMARY KEY,
    date TEXT NOT NULL,
    description TEXT NOT NULL,
    amount TEXT NOT NULL,
    transaction_type TEXT NOT NULL CHECK (transaction_type IN ('income', 'expense')),
    category TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

pub fn establish_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute(CREATE_TRANSACTIONS, [])?;
    Ok(conn)
}

pub fn establish_in_memory_connection() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute(CREATE_TRANSACTIONS, [])?;
    Ok(conn)
}
