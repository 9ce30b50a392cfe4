use super::add::parse_transaction_id;
use crate::error::LedgerError;
use crate::ledger::TransactionLedger;
use crate::models::transaction::Transaction;
use crate::storage::TransactionStore;

pub fn remove_transaction<S: TransactionStore>(
    ledger: &mut TransactionLedger<S>,
    id_input: &str,
) -> Result<Transaction, LedgerError> {
    let id = parse_transaction_id(id_input)?;
    ledger.remove(id)
}
