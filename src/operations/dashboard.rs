use super::report::{format_money, format_percentage, format_signed, rank_categories};
use crate::ledger::TransactionLedger;
use crate::models::summary::{CategoryShare, Totals, WeekdayTotals};
use crate::models::transaction::Transaction;
use crate::storage::TransactionStore;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::io;

pub const RECENT_LIMIT: usize = 5;

const PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Red,
    Color::LightCyan,
    Color::LightMagenta,
];

/// Snapshot of everything the dashboard draws.
pub struct DashboardView {
    pub totals: Totals,
    pub categories: Vec<CategoryShare>,
    pub week: [WeekdayTotals; 7],
    pub recent: Vec<Transaction>,
    pub out_of_sync: bool,
}

impl DashboardView {
    pub fn build<S: TransactionStore>(ledger: &TransactionLedger<S>) -> Self {
        Self {
            totals: ledger.totals(),
            categories: rank_categories(&ledger.by_category()),
            week: ledger.weekly_series(),
            recent: ledger.recent(RECENT_LIMIT).into_iter().cloned().collect(),
            out_of_sync: ledger.is_diverged(),
        }
    }

    fn week_max(&self) -> Decimal {
        self.week
            .iter()
            .map(|day| day.expense.max(day.income))
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Number of cells a bar of `value` gets when `max` fills `width`.
pub fn bar_length(value: Decimal, max: Decimal, width: usize) -> usize {
    if max <= Decimal::ZERO || value <= Decimal::ZERO || width == 0 {
        return 0;
    }
    let ratio = value
        .checked_div(max)
        .map_or(1.0, |ratio| ratio.to_f64().unwrap_or(0.0))
        .clamp(0.0, 1.0);
    ((ratio * width as f64).round() as usize).max(1)
}

pub fn run_dashboard<S: TransactionStore>(ledger: &TransactionLedger<S>) -> Result<(), String> {
    let view = DashboardView::build(ledger);

    enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| format!("Failed to enter alternate screen: {}", e))?;

    let result = (|| {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)
            .map_err(|e| format!("Failed to initialize terminal: {}", e))?;

        loop {
            terminal
                .draw(|frame| {
                    let rows = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([
                            Constraint::Length(5),
                            Constraint::Min(9),
                            Constraint::Length(RECENT_LIMIT as u16 + 2),
                        ])
                        .split(frame.area());

                    render_summary(frame, rows[0], &view);

                    let middle = Layout::default()
                        .direction(Direction::Horizontal)
                        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                        .split(rows[1]);

                    render_week(frame, middle[0], &view);
                    render_categories(frame, middle[1], &view);
                    render_recent(frame, rows[2], &view);
                })
                .map_err(|e| format!("Failed to draw terminal UI: {}", e))?;

            if event::poll(std::time::Duration::from_millis(250))
                .map_err(|e| format!("Failed to poll input: {}", e))?
            {
                match event::read().map_err(|e| format!("Failed to read input: {}", e))? {
                    Event::Key(key) if key.code == KeyCode::Char('q') => break,
                    Event::Key(key) if key.code == KeyCode::Esc => break,
                    _ => {}
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode().map_err(|e| format!("Failed to disable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)
        .map_err(|e| format!("Failed to leave alternate screen: {}", e))?;

    result
}

fn render_summary(frame: &mut ratatui::Frame, area: Rect, view: &DashboardView) {
    let mut title = String::from("Summary  (press q to exit)");
    if view.out_of_sync {
        title.push_str("  [out of sync with store]");
    }
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(inner);

    let balance_color = if view.totals.balance < Decimal::ZERO {
        Color::Red
    } else {
        Color::Blue
    };
    let entries = [
        ("Balance", view.totals.balance, balance_color, view.totals.savings_rate()),
        ("Expense", view.totals.expense, Color::Red, view.totals.expense_ratio()),
        ("Income", view.totals.income, Color::Green, Decimal::ONE_HUNDRED),
    ];
    for (area, (label, amount, color, percentage)) in cards.iter().zip(entries) {
        let lines = vec![
            Line::from(Span::styled(
                label,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format_money(amount), Style::default().fg(color))),
            Line::from(Span::raw(format_percentage(percentage))),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), *area);
    }
}

fn render_week(frame: &mut ratatui::Frame, area: Rect, view: &DashboardView) {
    let block = Block::default()
        .title("Weekly (all weeks)")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let bar_width = (inner.width as usize).saturating_sub(5);
    let max = view.week_max();
    let mut lines = Vec::new();
    for day in &view.week {
        let expense = bar_length(day.expense, max, bar_width);
        let income = bar_length(day.income, max, bar_width);
        lines.push(Line::from(vec![
            Span::raw(format!("{:<4} ", day.label())),
            Span::styled("█".repeat(expense), Style::default().fg(Color::Red)),
        ]));
        lines.push(Line::from(vec![
            Span::raw("     "),
            Span::styled("█".repeat(income), Style::default().fg(Color::Green)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_categories(frame: &mut ratatui::Frame, area: Rect, view: &DashboardView) {
    let block = Block::default()
        .title("Category Spend")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.categories.is_empty() {
        let empty = Paragraph::new("No expenses yet").alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{:15}", "Category"),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{:>12} {:>5}", "Amount", "Share"),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ])];
    for (idx, share) in view.categories.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];
        lines.push(Line::from(vec![
            Span::styled(format!("{:15}", share.category), Style::default().fg(color)),
            Span::styled(
                format!(
                    "{:>12} {:>5}",
                    format_money(share.total),
                    format_percentage(share.percentage)
                ),
                Style::default().fg(color),
            ),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_recent(frame: &mut ratatui::Frame, area: Rect, view: &DashboardView) {
    let block = Block::default()
        .title("Recent Transactions")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.recent.is_empty() {
        let empty = Paragraph::new("No transactions yet. Add one to get started!")
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let lines: Vec<Line> = view
        .recent
        .iter()
        .map(|transaction| {
            let color = if transaction.is_income() {
                Color::Green
            } else {
                Color::Red
            };
            Line::from(vec![
                Span::raw(format!(
                    "{}  {:<28} {:<14}",
                    transaction.date.format("%b %d"),
                    transaction.description,
                    transaction.category
                )),
                Span::styled(
                    format!("{:>12}", format_signed(transaction)),
                    Style::default().fg(color),
                ),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncPolicy;
    use crate::operations::add::add_transaction;
    use crate::storage::MemoryStore;

    #[test]
    fn test_bar_length_scales_to_width() {
        assert_eq!(bar_length(Decimal::new(50, 0), Decimal::new(100, 0), 20), 10);
        assert_eq!(bar_length(Decimal::new(100, 0), Decimal::new(100, 0), 20), 20);
        assert_eq!(bar_length(Decimal::ZERO, Decimal::new(100, 0), 20), 0);
        assert_eq!(bar_length(Decimal::ONE, Decimal::ZERO, 20), 0);
    }

    #[test]
    fn test_bar_length_keeps_small_values_visible() {
        assert_eq!(bar_length(Decimal::ONE, Decimal::new(10000, 0), 20), 1);
    }

    #[test]
    fn test_bar_length_with_extreme_ratio_fills_width() {
        assert_eq!(bar_length(Decimal::MAX, Decimal::new(1, 28), 20), 20);
    }

    #[test]
    fn test_build_view_from_ledger() {
        let (mut ledger, _) = TransactionLedger::open(MemoryStore::new(), SyncPolicy::Rollback);
        for line in [
            "2024-01-01, Salary, 1000, income, Salary",
            "2024-01-02, Coffee, 4.50, expense, Food",
            "2024-01-03, Power, 60, expense, Bills",
            "2024-01-04, Lunch, 12, expense, Food",
            "2024-01-05, Book, 20, expense, Shopping",
            "2024-01-06, Movie, 15, expense, Entertainment",
        ] {
            add_transaction(&mut ledger, line).unwrap();
        }

        let view = DashboardView::build(&ledger);
        assert_eq!(view.recent.len(), RECENT_LIMIT);
        assert_eq!(view.recent[0].description, "Movie");
        assert_eq!(view.categories[0].category.as_str(), "Bills");
        assert_eq!(view.week_max(), Decimal::new(1000, 0));
        assert!(!view.out_of_sync);
    }
}
