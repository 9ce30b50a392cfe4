use crate::models::summary::{CategoryShare, MonthTotals, Totals, WeekdayTotals, percentage};
use crate::models::transaction::{Category, Transaction};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Sorts categories by total, largest first, and attaches each one's share
/// of all expenses. Every share is zero when there are no expenses.
pub fn rank_categories(by_category: &HashMap<Category, Decimal>) -> Vec<CategoryShare> {
    let total_expense = by_category
        .values()
        .fold(Decimal::ZERO, |sum, total| sum.saturating_add(*total));

    let mut shares: Vec<CategoryShare> = by_category
        .iter()
        .map(|(category, total)| CategoryShare {
            category: category.clone(),
            total: *total,
            percentage: if total_expense.is_zero() {
                Decimal::ZERO
            } else {
                percentage(*total, total_expense).min(Decimal::ONE_HUNDRED)
            },
        })
        .collect();
    shares.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });
    shares
}

pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// `+12.00` for income, `-4.50` for expenses.
pub fn format_signed(transaction: &Transaction) -> String {
    let signed = transaction.signed_amount();
    let sign = if signed < Decimal::ZERO { "-" } else { "+" };
    format!("{}{}", sign, format_money(signed.abs()))
}

pub fn format_percentage(percentage: Decimal) -> String {
    format!("{}%", percentage.round_dp(0))
}

pub fn format_transaction(transaction: &Transaction) -> String {
    format!(
        "{}  {}  {:<30} {:<14} {:>12}",
        transaction.id,
        transaction.date.format("%Y-%m-%d"),
        transaction.description,
        transaction.category,
        format_signed(transaction)
    )
}

pub fn summary_lines(totals: &Totals) -> Vec<String> {
    vec![
        format!("Balance: {:>12}", format_money(totals.balance)),
        format!(
            "Income:  {:>12}",
            format_money(totals.income)
        ),
        format!(
            "Expense: {:>12}  ({} of income)",
            format_money(totals.expense),
            format_percentage(totals.expense_ratio())
        ),
    ]
}

pub fn category_lines(shares: &[CategoryShare]) -> Vec<String> {
    if shares.is_empty() {
        return vec!["No expenses recorded".to_string()];
    }
    shares
        .iter()
        .map(|share| {
            format!(
                "{:<15} {:>12} {:>5}",
                share.category,
                format_money(share.total),
                format_percentage(share.percentage)
            )
        })
        .collect()
}

pub fn weekly_lines(series: &[WeekdayTotals]) -> Vec<String> {
    series
        .iter()
        .map(|day| {
            format!(
                "{}  expense {:>12}  income {:>12}",
                day.label(),
                format_money(day.expense),
                format_money(day.income)
            )
        })
        .collect()
}

pub fn monthly_lines(series: &[MonthTotals]) -> Vec<String> {
    series
        .iter()
        .map(|month| {
            format!(
                "{}  expense {:>12}  income {:>12}",
                month.label(),
                format_money(month.expense),
                format_money(month.income)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::{NewTransaction, TransactionId, TransactionType};
    use chrono::{NaiveDate, Utc, Weekday};

    fn breakdown(entries: &[(Category, i64)]) -> HashMap<Category, Decimal> {
        entries
            .iter()
            .map(|(category, total)| (category.clone(), Decimal::new(*total, 0)))
            .collect()
    }

    #[test]
    fn test_rank_categories_food_and_bills() {
        let shares = rank_categories(&breakdown(&[(Category::Bills, 10), (Category::Food, 30)]));

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].category, Category::Food);
        assert_eq!(shares[0].percentage, Decimal::new(75, 0));
        assert_eq!(shares[1].category, Category::Bills);
        assert_eq!(shares[1].percentage, Decimal::new(25, 0));

        let sum: Decimal = shares.iter().map(|s| s.percentage).sum();
        assert_eq!(sum, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_rank_categories_without_expenses() {
        let shares = rank_categories(&breakdown(&[(Category::Food, 0)]));
        assert_eq!(shares[0].percentage, Decimal::ZERO);
        assert!(rank_categories(&HashMap::new()).is_empty());
    }

    #[test]
    fn test_rank_categories_shares_never_exceed_hundred() {
        let shares = rank_categories(&breakdown(&[
            (Category::Food, 1),
            (Category::Bills, 1),
            (Category::Home, 1),
        ]));
        let sum: Decimal = shares.iter().map(|s| s.percentage).sum();
        assert!(sum <= Decimal::ONE_HUNDRED);
        assert_eq!(sum.round_dp(10), Decimal::ONE_HUNDRED);
        // Equal totals fall back to name order.
        let names: Vec<&str> = shares.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, ["Bills", "Food", "Home"]);
    }

    #[test]
    fn test_rank_categories_with_huge_totals() {
        let mut huge = HashMap::new();
        huge.insert(Category::Home, Decimal::from_i128_with_scale(10_i128.pow(27), 0));
        let shares = rank_categories(&huge);
        assert_eq!(shares[0].percentage, Decimal::ONE_HUNDRED);

        huge.insert(Category::Food, Decimal::MAX);
        huge.insert(Category::Bills, Decimal::MAX);
        let shares = rank_categories(&huge);
        assert_eq!(shares.len(), 3);
        assert!(shares.iter().all(|s| s.percentage <= Decimal::ONE_HUNDRED));
    }

    #[test]
    fn test_format_signed() {
        let transaction = NewTransaction::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            "Coffee",
            Decimal::new(45, 1),
            TransactionType::Expense,
            Category::Food,
        )
        .into_transaction(TransactionId::new(), Utc::now());
        assert_eq!(format_signed(&transaction), "-4.50");

        let mut income = transaction.clone();
        income.transaction_type = TransactionType::Income;
        income.amount = Decimal::new(12, 0);
        assert_eq!(format_signed(&income), "+12.00");
    }

    #[test]
    fn test_summary_and_weekly_lines() {
        let totals = Totals::new(Decimal::new(200, 0), Decimal::new(50, 0));
        let lines = summary_lines(&totals);
        assert!(lines[0].ends_with("150.00"));
        assert!(lines[2].contains("(25% of income)"));

        let week = [WeekdayTotals {
            weekday: Weekday::Tue,
            expense: Decimal::new(450, 2),
            income: Decimal::ZERO,
        }];
        let lines = weekly_lines(&week);
        assert!(lines[0].starts_with("Tue"));
        assert!(lines[0].contains("4.50"));
    }

    #[test]
    fn test_category_lines_empty() {
        assert_eq!(category_lines(&[]), vec!["No expenses recorded".to_string()]);
    }
}
