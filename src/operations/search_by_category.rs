use crate::models::transaction::{Transaction, TransactionType};

pub fn search_transactions_by_category<'a>(
    category: &str,
    transactions: &[&'a Transaction],
) -> Vec<&'a Transaction> {
    let category = category.trim();
    transactions
        .iter()
        .copied()
        .filter(|transaction| transaction.category.as_str().eq_ignore_ascii_case(category))
        .collect()
}

pub fn filter_by_type<'a>(
    transaction_type: TransactionType,
    transactions: &[&'a Transaction],
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .copied()
        .filter(|transaction| transaction.transaction_type == transaction_type)
        .collect()
}
