use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{Field, LedgerError};
use crate::ledger::TransactionLedger;
use crate::models::transaction::{Category, NewTransaction, Transaction, TransactionId, TransactionType};
use crate::storage::TransactionStore;

pub const INPUT_FORMAT: &str = "date(YYYY-MM-DD), description, amount, type(income/expense), category";

const FIELD_ORDER: [Field; 5] = [
    Field::Date,
    Field::Description,
    Field::Amount,
    Field::Type,
    Field::Category,
];

/// Parses `date, description, amount, type, category`.
pub fn parse_transaction_input(input: &str) -> Result<NewTransaction, LedgerError> {
    let detail_parts: Vec<&str> = input.split(',').map(|s| s.trim()).collect();
    if detail_parts.len() != 5 {
        // Blame the first missing column, or the last one when there are extras.
        let field = FIELD_ORDER
            .get(detail_parts.len())
            .copied()
            .unwrap_or(Field::Category);
        return Err(LedgerError::invalid(
            field,
            format!(
                "expected 5 details separated by commas but got {}",
                detail_parts.len()
            ),
        ));
    }
    parse_fields(
        detail_parts[0],
        detail_parts[1],
        detail_parts[2],
        detail_parts[3],
        detail_parts[4],
    )
}

pub fn parse_fields(
    date: &str,
    description: &str,
    amount: &str,
    transaction_type: &str,
    category: &str,
) -> Result<NewTransaction, LedgerError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        LedgerError::invalid(Field::Date, format!("'{}' is not a date, use YYYY-MM-DD", date))
    })?;

    let amount = amount.trim().parse::<Decimal>().map_err(|_| {
        LedgerError::invalid(Field::Amount, format!("'{}' is not a valid decimal number", amount))
    })?;

    let transaction_type = transaction_type.parse::<TransactionType>()?;
    let category = Category::parse(category)?;

    let draft = NewTransaction::new(date, description.trim(), amount, transaction_type, category);
    draft.validate()?;
    Ok(draft)
}

pub fn parse_transaction_id(input: &str) -> Result<TransactionId, LedgerError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(LedgerError::invalid(Field::Id, "transaction ID cannot be empty"));
    }
    input.parse::<TransactionId>().map_err(|_| {
        LedgerError::invalid(Field::Id, format!("'{}' is not a valid transaction ID", input))
    })
}

pub fn add_transaction<S: TransactionStore>(
    ledger: &mut TransactionLedger<S>,
    input: &str,
) -> Result<Transaction, LedgerError> {
    let draft = parse_transaction_input(input)?;
    ledger.add(draft)
}

pub fn update_transaction<S: TransactionStore>(
    ledger: &mut TransactionLedger<S>,
    id_input: &str,
    input: &str,
) -> Result<Transaction, LedgerError> {
    let id = parse_transaction_id(id_input)?;
    if ledger.get(id).is_none() {
        return Err(LedgerError::NotFound(id));
    }
    let draft = parse_transaction_input(input)?;
    ledger.update(id, draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncPolicy;
    use crate::storage::MemoryStore;

    fn empty_ledger() -> TransactionLedger<MemoryStore> {
        TransactionLedger::open(MemoryStore::new(), SyncPolicy::Rollback).0
    }

    #[test]
    fn test_parse_valid_input() {
        let draft = parse_transaction_input("2024-01-02, Coffee, 4.50, expense, food").unwrap();
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(draft.description, "Coffee");
        assert_eq!(draft.amount, Decimal::new(450, 2));
        assert_eq!(draft.transaction_type, TransactionType::Expense);
        assert_eq!(draft.category, Category::Food);
    }

    #[test]
    fn test_parse_wrong_number_of_parts() {
        let err = parse_transaction_input("2024-01-02, Coffee, 4.50").unwrap_err();
        assert!(err.to_string().contains("expected 5 details"));
        assert_eq!(err.invalid_field(), Some(Field::Type));
    }

    #[test]
    fn test_parse_names_offending_field() {
        let cases = [
            ("02/01/2024, Coffee, 4.50, expense, Food", Field::Date),
            ("2024-02-30, Coffee, 4.50, expense, Food", Field::Date),
            ("2024-01-02, , 4.50, expense, Food", Field::Description),
            ("2024-01-02, Coffee, four, expense, Food", Field::Amount),
            ("2024-01-02, Coffee, -4.50, expense, Food", Field::Amount),
            ("2024-01-02, Coffee, 0, expense, Food", Field::Amount),
            ("2024-01-02, Coffee, 4.50, transfer, Food", Field::Type),
            ("2024-01-02, Coffee, 4.50, expense, ", Field::Category),
        ];
        for (input, field) in cases {
            let err = parse_transaction_input(input).unwrap_err();
            assert_eq!(err.invalid_field(), Some(field), "input: {}", input);
        }
    }

    #[test]
    fn test_parse_transaction_id() {
        let id = TransactionId::new();
        assert_eq!(parse_transaction_id(&format!(" {} ", id)).unwrap(), id);
        assert_eq!(parse_transaction_id("").unwrap_err().invalid_field(), Some(Field::Id));
        assert_eq!(parse_transaction_id("42").unwrap_err().invalid_field(), Some(Field::Id));
    }

    #[test]
    fn test_add_transaction_to_ledger() {
        let mut ledger = empty_ledger();
        let stored = add_transaction(&mut ledger, "2024-01-02, Coffee, 4.50, expense, Food").unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(stored.id), Some(&stored));
    }

    #[test]
    fn test_update_transaction_in_ledger() {
        let mut ledger = empty_ledger();
        let stored = add_transaction(&mut ledger, "2024-01-02, Coffee, 4.50, expense, Food").unwrap();

        let updated = update_transaction(
            &mut ledger,
            &stored.id.to_string(),
            "2024-01-03, Tea, 3.00, expense, Food",
        )
        .unwrap();
        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.description, "Tea");
        assert_eq!(ledger.totals().expense, Decimal::new(300, 2));
    }

    #[test]
    fn test_update_unknown_id_reports_not_found_first() {
        let mut ledger = empty_ledger();
        let err = update_transaction(&mut ledger, &TransactionId::new().to_string(), "garbage")
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }
}
