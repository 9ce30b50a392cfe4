//! The session's authoritative transaction collection and its derived views.

use chrono::{Datelike, Utc, Weekday};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::config::SyncPolicy;
use crate::error::{LedgerError, StorageError, SyncOutcome};
use crate::models::summary::{MonthTotals, Totals, WeekdayTotals};
use crate::models::transaction::{
    Category, NewTransaction, Transaction, TransactionId, TransactionType,
};
use crate::storage::TransactionStore;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub struct TransactionLedger<S: TransactionStore> {
    store: S,
    transactions: Vec<Transaction>,
    policy: SyncPolicy,
    diverged: bool,
}

impl<S: TransactionStore> TransactionLedger<S> {
    /// Loads the store's contents. When loading fails the ledger starts empty,
    /// is marked diverged, and the failure is handed back alongside it.
    pub fn open(mut store: S, policy: SyncPolicy) -> (Self, Option<LedgerError>) {
        let (transactions, load_error) = match store.load_all() {
            Ok(rows) => (accept_loaded(rows), None),
            Err(source) => {
                warn!(error = %source, "failed to load transactions, starting empty");
                (
                    Vec::new(),
                    Some(LedgerError::Persistence {
                        outcome: SyncOutcome::NotApplied,
                        source,
                    }),
                )
            }
        };
        info!(count = transactions.len(), ?policy, "ledger opened");

        let ledger = Self {
            store,
            diverged: load_error.is_some(),
            transactions,
            policy,
        };
        (ledger, load_error)
    }

    /// Ends the session and returns the store.
    pub fn close(self) -> S {
        debug!(count = self.transactions.len(), diverged = self.diverged, "ledger closed");
        self.store
    }

    pub fn add(&mut self, record: NewTransaction) -> Result<Transaction, LedgerError> {
        record.validate()?;

        match self.store.insert(&record) {
            Ok(stored) => {
                debug!(id = %stored.id, "transaction added");
                self.transactions.push(stored.clone());
                Ok(stored)
            }
            Err(source) => {
                let outcome = match self.policy {
                    SyncPolicy::Rollback => SyncOutcome::NotApplied,
                    SyncPolicy::KeepLocal => {
                        let local = record.into_transaction(TransactionId::new(), Utc::now());
                        self.transactions.push(local);
                        self.diverged = true;
                        SyncOutcome::CommittedLocally
                    }
                };
                Err(self.persistence_failure("add", outcome, source))
            }
        }
    }

    /// Replaces every field of `id` except the id itself and `created_at`.
    pub fn update(
        &mut self,
        id: TransactionId,
        record: NewTransaction,
    ) -> Result<Transaction, LedgerError> {
        let pos = self.position(id)?;
        record.validate()?;

        let created_at = self.transactions[pos].created_at;
        let updated = record.into_transaction(id, created_at);
        let previous = std::mem::replace(&mut self.transactions[pos], updated.clone());

        match self.store.update_by_id(id, &updated) {
            Ok(()) => {
                debug!(%id, "transaction updated");
                Ok(updated)
            }
            Err(source) => {
                let outcome = match self.policy {
                    SyncPolicy::Rollback => {
                        self.transactions[pos] = previous;
                        SyncOutcome::NotApplied
                    }
                    SyncPolicy::KeepLocal => {
                        self.diverged = true;
                        SyncOutcome::CommittedLocally
                    }
                };
                Err(self.persistence_failure("update", outcome, source))
            }
        }
    }

    pub fn remove(&mut self, id: TransactionId) -> Result<Transaction, LedgerError> {
        let pos = self.position(id)?;
        let removed = self.transactions.remove(pos);

        match self.store.delete_by_id(id) {
            Ok(()) => {
                debug!(%id, "transaction removed");
                Ok(removed)
            }
            Err(source) => {
                let outcome = match self.policy {
                    SyncPolicy::Rollback => {
                        self.transactions.insert(pos, removed);
                        SyncOutcome::NotApplied
                    }
                    SyncPolicy::KeepLocal => {
                        self.diverged = true;
                        SyncOutcome::CommittedLocally
                    }
                };
                Err(self.persistence_failure("remove", outcome, source))
            }
        }
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// All transactions, newest `created_at` first.
    pub fn transactions(&self) -> Vec<&Transaction> {
        let mut ordered: Vec<&Transaction> = self.transactions.iter().rev().collect();
        ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        ordered
    }

    pub fn recent(&self, limit: usize) -> Vec<&Transaction> {
        let mut ordered = self.transactions();
        ordered.truncate(limit);
        ordered
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// True once a store failure left the ledger and the store disagreeing.
    pub fn is_diverged(&self) -> bool {
        self.diverged
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn totals(&self) -> Totals {
        let mut income = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        for transaction in &self.transactions {
            match transaction.transaction_type {
                TransactionType::Income => income = income.saturating_add(transaction.amount),
                TransactionType::Expense => expense = expense.saturating_add(transaction.amount),
            }
        }
        Totals::new(income, expense)
    }

    /// Summed expense amount per category. Income is ignored.
    pub fn by_category(&self) -> HashMap<Category, Decimal> {
        let mut totals: HashMap<Category, Decimal> = HashMap::new();
        for transaction in self.transactions.iter().filter(|t| t.is_expense()) {
            let total = totals
                .entry(transaction.category.clone())
                .or_insert(Decimal::ZERO);
            *total = total.saturating_add(transaction.amount);
        }
        totals
    }

    /// Mon..Sun buckets keyed only by weekday, so transactions from
    /// different calendar weeks land in the same bucket.
    pub fn weekly_series(&self) -> [WeekdayTotals; 7] {
        let mut series = WEEK.map(WeekdayTotals::empty);
        for transaction in &self.transactions {
            let bucket = &mut series[transaction.date.weekday().num_days_from_monday() as usize];
            match transaction.transaction_type {
                TransactionType::Income => {
                    bucket.income = bucket.income.saturating_add(transaction.amount)
                }
                TransactionType::Expense => {
                    bucket.expense = bucket.expense.saturating_add(transaction.amount)
                }
            }
        }
        series
    }

    /// Jan..Dec buckets for the given calendar year.
    pub fn monthly_series(&self, year: i32) -> [MonthTotals; 12] {
        let mut series: [MonthTotals; 12] = std::array::from_fn(|i| MonthTotals {
            month: i as u32 + 1,
            expense: Decimal::ZERO,
            income: Decimal::ZERO,
        });
        for transaction in self.transactions.iter().filter(|t| t.date.year() == year) {
            let bucket = &mut series[transaction.date.month0() as usize];
            match transaction.transaction_type {
                TransactionType::Income => {
                    bucket.income = bucket.income.saturating_add(transaction.amount)
                }
                TransactionType::Expense => {
                    bucket.expense = bucket.expense.saturating_add(transaction.amount)
                }
            }
        }
        series
    }

    fn position(&self, id: TransactionId) -> Result<usize, LedgerError> {
        self.transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or(LedgerError::NotFound(id))
    }

    fn persistence_failure(
        &self,
        operation: &str,
        outcome: SyncOutcome,
        source: StorageError,
    ) -> LedgerError {
        warn!(operation, %outcome, error = %source, "store write failed");
        LedgerError::Persistence { outcome, source }
    }
}

fn accept_loaded(rows: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    let mut accepted = Vec::with_capacity(rows.len());
    for row in rows {
        if let Err(e) = row.validate() {
            warn!(id = %row.id, error = %e, "skipping invalid stored transaction");
            continue;
        }
        if !seen.insert(row.id) {
            warn!(id = %row.id, "skipping stored transaction with duplicate id");
            continue;
        }
        accepted.push(row);
    }
    // Stores may return rows newest first; keep insertion order oldest first.
    accepted.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    accepted
}
