use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Field, LedgerError};

pub const MAX_DESCRIPTION_LEN: usize = 255;
pub const MAX_CATEGORY_LEN: usize = 50;
/// 1,000,000,000,000. Keeps ledger-wide sums and `* 100` well inside `Decimal`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TransactionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(LedgerError::invalid(
                Field::Type,
                format!("'{}' is not a transaction type, use 'income' or 'expense'", other),
            )),
        }
    }
}

/// Spending/earning category. The known set is matched case-insensitively;
/// anything else is kept verbatim as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Food,
    Bills,
    Shopping,
    Home,
    Entertainment,
    Salary,
    Freelance,
    Other,
    Custom(String),
}

impl Category {
    pub const KNOWN: [Category; 8] = [
        Category::Food,
        Category::Bills,
        Category::Shopping,
        Category::Home,
        Category::Entertainment,
        Category::Salary,
        Category::Freelance,
        Category::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Food => "Food",
            Category::Bills => "Bills",
            Category::Shopping => "Shopping",
            Category::Home => "Home",
            Category::Entertainment => "Entertainment",
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Other => "Other",
            Category::Custom(name) => name,
        }
    }

    /// Parses user input, rejecting empty or overlong names.
    pub fn parse(input: &str) -> Result<Self, LedgerError> {
        let name = input.trim();
        if name.is_empty() {
            return Err(LedgerError::invalid(Field::Category, "category cannot be empty"));
        }
        if name.chars().count() > MAX_CATEGORY_LEN {
            return Err(LedgerError::invalid(
                Field::Category,
                format!("category longer than {} characters", MAX_CATEGORY_LEN),
            ));
        }
        Ok(Category::from(name))
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        let name = name.trim();
        Category::KNOWN
            .into_iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(name))
            .unwrap_or_else(|| Category::Custom(name.to_string()))
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::from(name.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Custom(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction as submitted by the user, before the store assigns
/// `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub category: Category,
}

impl NewTransaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
        transaction_type: TransactionType,
        category: Category,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            transaction_type,
            category,
        }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_fields(&self.description, self.amount, &self.category)
    }

    pub fn into_transaction(self, id: TransactionId, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            date: self.date,
            description: self.description.trim().to_string(),
            amount: self.amount,
            transaction_type: self.transaction_type,
            category: self.category,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Same field rules as `NewTransaction::validate`, for rows read back from a store.
    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_fields(&self.description, self.amount, &self.category)
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Amount with the direction applied: positive for income, negative for expenses.
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

fn validate_fields(description: &str, amount: Decimal, category: &Category) -> Result<(), LedgerError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(LedgerError::invalid(Field::Description, "description cannot be empty"));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(LedgerError::invalid(
            Field::Description,
            format!("description longer than {} characters", MAX_DESCRIPTION_LEN),
        ));
    }
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid(
            Field::Amount,
            format!("amount must be greater than zero, got {}", amount),
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::invalid(
            Field::Amount,
            format!("amount must not exceed {}, got {}", MAX_AMOUNT, amount),
        ));
    }
    if let Category::Custom(name) = category {
        if name.trim().is_empty() {
            return Err(LedgerError::invalid(Field::Category, "category cannot be empty"));
        }
        if name.chars().count() > MAX_CATEGORY_LEN {
            return Err(LedgerError::invalid(
                Field::Category,
                format!("category longer than {} characters", MAX_CATEGORY_LEN),
            ));
        }
    }
    Ok(())
}
