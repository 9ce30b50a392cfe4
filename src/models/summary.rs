use chrono::Weekday;
use rust_decimal::Decimal;

use crate::models::transaction::Category;

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

impl Totals {
    pub fn new(income: Decimal, expense: Decimal) -> Self {
        Self {
            income,
            expense,
            balance: income.saturating_sub(expense),
        }
    }

    /// Expenses as a percentage of income, capped at 100. Zero without income.
    pub fn expense_ratio(&self) -> Decimal {
        percent_of_income(self.expense, self.income)
    }

    /// Absolute balance as a percentage of income, capped at 100. Zero without income.
    pub fn savings_rate(&self) -> Decimal {
        percent_of_income(self.balance.abs(), self.income)
    }
}

fn percent_of_income(value: Decimal, income: Decimal) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    percentage(value, income).min(Decimal::ONE_HUNDRED)
}

/// `part` as a percentage of a non-zero `whole`. Divides first when
/// `part * 100` does not fit, and saturates if the quotient itself is too large.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .or_else(|| {
            part.checked_div(whole)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        })
        .unwrap_or(Decimal::MAX)
}

/// One row of a ranked category breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryShare {
    pub category: Category,
    pub total: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayTotals {
    pub weekday: Weekday,
    pub expense: Decimal,
    pub income: Decimal,
}

impl WeekdayTotals {
    pub fn empty(weekday: Weekday) -> Self {
        Self {
            weekday,
            expense: Decimal::ZERO,
            income: Decimal::ZERO,
        }
    }

    pub fn label(&self) -> &'static str {
        WEEKDAY_LABELS[self.weekday.num_days_from_monday() as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthTotals {
    /// 1-based month number.
    pub month: u32,
    pub expense: Decimal,
    pub income: Decimal,
}

impl MonthTotals {
    /// Three-letter month name, `"???"` outside 1..=12.
    pub fn label(&self) -> &'static str {
        self.month
            .checked_sub(1)
            .and_then(|index| MONTH_LABELS.get(index as usize))
            .copied()
            .unwrap_or("???")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_balance_is_income_minus_expense() {
        let totals = Totals::new(Decimal::new(1000, 0), Decimal::new(1250, 0));
        assert_eq!(totals.balance, Decimal::new(-250, 0));
    }

    #[test]
    fn test_expense_ratio_without_income_is_zero() {
        let totals = Totals::new(Decimal::ZERO, Decimal::new(40, 0));
        assert_eq!(totals.expense_ratio(), Decimal::ZERO);
        assert_eq!(totals.savings_rate(), Decimal::ZERO);
    }

    #[test]
    fn test_expense_ratio_is_capped() {
        let totals = Totals::new(Decimal::new(100, 0), Decimal::new(150, 0));
        assert_eq!(totals.expense_ratio(), Decimal::ONE_HUNDRED);
        assert_eq!(totals.savings_rate(), Decimal::new(50, 0));
    }

    #[test]
    fn test_weekday_and_month_labels() {
        assert_eq!(WeekdayTotals::empty(Weekday::Tue).label(), "Tue");
        assert_eq!(WeekdayTotals::empty(Weekday::Sun).label(), "Sun");
        let december = MonthTotals {
            month: 12,
            expense: Decimal::ZERO,
            income: Decimal::ZERO,
        };
        assert_eq!(december.label(), "Dec");
    }

    #[test]
    fn test_month_label_out_of_range() {
        for month in [0, 13] {
            let bogus = MonthTotals {
                month,
                expense: Decimal::ZERO,
                income: Decimal::ZERO,
            };
            assert_eq!(bogus.label(), "???");
        }
    }

    #[test]
    fn test_ratios_at_decimal_limits() {
        let totals = Totals::new(Decimal::ONE, Decimal::MAX);
        assert_eq!(totals.expense_ratio(), Decimal::ONE_HUNDRED);
        assert_eq!(totals.savings_rate(), Decimal::ONE_HUNDRED);

        let tiny_income = Totals::new(Decimal::new(1, 28), Decimal::MAX);
        assert_eq!(tiny_income.expense_ratio(), Decimal::ONE_HUNDRED);

        let even = Totals::new(Decimal::MAX, Decimal::MAX);
        assert_eq!(even.balance, Decimal::ZERO);
        assert_eq!(even.expense_ratio(), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_percentage_divides_first_on_overflow() {
        let part = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let whole = part * Decimal::new(4, 0);
        assert_eq!(percentage(part, whole), Decimal::new(25, 0));
        assert_eq!(percentage(Decimal::ONE, Decimal::new(4, 0)), Decimal::new(25, 0));
    }
}
