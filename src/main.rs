use chrono::{Datelike, Local};
use clap::Parser;
use expense_ledger::config::LedgerConfig;
use expense_ledger::error::{LedgerError, SyncOutcome};
use expense_ledger::ledger::TransactionLedger;
use expense_ledger::logging;
use expense_ledger::models::transaction::TransactionType;
use expense_ledger::operations::add::{INPUT_FORMAT, add_transaction, update_transaction};
use expense_ledger::operations::dashboard::run_dashboard;
use expense_ledger::operations::import::{ImportFormat, import_transactions};
use expense_ledger::operations::remove::remove_transaction;
use expense_ledger::operations::report;
use expense_ledger::operations::search_by_category::{filter_by_type, search_transactions_by_category};
use std::io;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ledger", about = "Track income and expenses from the terminal")]
struct Cli {
    #[command(flatten)]
    config: LedgerConfig,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

pub enum UserCommands {
    Add,
    Update,
    Remove,
    Print,
    Search,
    Filter,
    Summary,
    Categories,
    Weekly,
    Monthly,
    Import,
    Dashboard,
    Exit,
    Unknown,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let store = match cli.config.open_store() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open storage: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let (mut ledger, load_error) = TransactionLedger::open(store, cli.config.sync_policy);
    if let Some(e) = load_error {
        println!("Warning: could not load saved transactions ({}). Starting empty.", e);
    }

    println!("Welcome to the transaction ledger!");
    loop {
        println!(
            "Please enter a command (add, update, remove, print, search, filter, summary, categories, weekly, monthly, import, dashboard, exit):"
        );

        let input = match read_user_input() {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("Error reading input: {}", e);
                continue;
            }
        };
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        let rest = parts[1..].join(" ");
        let argument = (!rest.is_empty()).then_some(rest.as_str());

        match check_for_command(parts[0]) {
            UserCommands::Add => {
                println!("Enter transaction details in the format:\n{}", INPUT_FORMAT);
                let Some(details) = prompt() else { continue };
                match add_transaction(&mut ledger, &details) {
                    Ok(transaction) => println!("Transaction {} added.", transaction.id),
                    Err(e) => report_error("adding transaction", &e),
                }
            }
            UserCommands::Update => {
                let id = match argument {
                    Some(id) => id.to_string(),
                    None => {
                        println!("Provide the transaction ID to update:");
                        let Some(id) = prompt() else { continue };
                        id
                    }
                };
                println!("Enter the new details in the format:\n{}", INPUT_FORMAT);
                let Some(details) = prompt() else { continue };
                match update_transaction(&mut ledger, &id, &details) {
                    Ok(transaction) => println!("Transaction {} updated.", transaction.id),
                    Err(e) => report_error("updating transaction", &e),
                }
            }
            UserCommands::Remove => {
                let id = match argument {
                    Some(id) => id.to_string(),
                    None => {
                        println!("Provide the transaction ID to remove:");
                        let Some(id) = prompt() else { continue };
                        id
                    }
                };
                match remove_transaction(&mut ledger, &id) {
                    Ok(_) => println!("Transaction removed successfully."),
                    Err(e) => report_error("removing transaction", &e),
                }
            }
            UserCommands::Print => {
                let transactions = ledger.transactions();
                if transactions.is_empty() {
                    println!("No transactions yet.");
                }
                for transaction in transactions {
                    println!("{}", report::format_transaction(transaction));
                }
            }
            UserCommands::Search => {
                let category = match argument {
                    Some(category) => category.to_string(),
                    None => {
                        println!("Provide the category to search for:");
                        let Some(category) = prompt() else { continue };
                        category
                    }
                };
                let all = ledger.transactions();
                let found = search_transactions_by_category(&category, &all);
                if found.is_empty() {
                    println!("No transactions found for category: {}", category);
                } else {
                    println!("Transactions found for category '{}':", category);
                    for transaction in found {
                        println!("{}", report::format_transaction(transaction));
                    }
                }
            }
            UserCommands::Filter => {
                let Some(kind) = argument else {
                    println!("Usage: filter <income|expense>");
                    continue;
                };
                let transaction_type = match kind.parse::<TransactionType>() {
                    Ok(t) => t,
                    Err(e) => {
                        report_error("filtering", &e);
                        continue;
                    }
                };
                let all = ledger.transactions();
                for transaction in filter_by_type(transaction_type, &all) {
                    println!("{}", report::format_transaction(transaction));
                }
            }
            UserCommands::Summary => {
                for line in report::summary_lines(&ledger.totals()) {
                    println!("{}", line);
                }
            }
            UserCommands::Categories => {
                let shares = report::rank_categories(&ledger.by_category());
                for line in report::category_lines(&shares) {
                    println!("{}", line);
                }
            }
            UserCommands::Weekly => {
                for line in report::weekly_lines(&ledger.weekly_series()) {
                    println!("{}", line);
                }
            }
            UserCommands::Monthly => {
                let year = match argument.map(str::parse::<i32>) {
                    Some(Ok(year)) => year,
                    Some(Err(_)) => {
                        println!("Invalid year. Usage: monthly [YYYY]");
                        continue;
                    }
                    None => Local::now().year(),
                };
                println!("{}:", year);
                for line in report::monthly_lines(&ledger.monthly_series(year)) {
                    println!("{}", line);
                }
            }
            UserCommands::Import => {
                println!("Enter the file path to import from (only csv for now):");
                let Some(path) = prompt() else { continue };
                match import_transactions(&mut ledger, ImportFormat::Csv, &path) {
                    Ok(count) => println!("Successfully imported {} transactions.", count),
                    Err(e) => println!("Error importing transactions: {}", e),
                }
            }
            UserCommands::Dashboard => {
                if let Err(e) = run_dashboard(&ledger) {
                    println!("Error showing dashboard: {}", e);
                }
            }
            UserCommands::Exit => {
                println!("Exiting the application.");
                break;
            }
            UserCommands::Unknown => {
                println!("Unknown command '{}'.", parts[0]);
            }
        }
    }

    if ledger.is_diverged() {
        println!("Warning: some changes were not saved to storage.");
    }
    drop(ledger.close());
    ExitCode::SUCCESS
}

fn report_error(action: &str, error: &LedgerError) {
    match error {
        LedgerError::InvalidInput { .. } => {
            println!("Error {}: {}", action, error);
            println!("Please try again.");
        }
        LedgerError::NotFound(_) => println!("Error {}: {}", action, error),
        LedgerError::Persistence { outcome, .. } => {
            println!("Error {}: {}", action, error);
            if *outcome == SyncOutcome::CommittedLocally {
                println!("The change is kept for this session but storage is out of sync.");
            }
        }
    }
}

fn prompt() -> Option<String> {
    match read_user_input() {
        Ok(details) => Some(details),
        Err(e) => {
            println!("Error reading input: {}", e);
            None
        }
    }
}

fn read_user_input() -> Result<String, String> {
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .map_err(|_| "Failed to read line".to_string())?;
    if read == 0 {
        return Ok("exit".to_string());
    }
    Ok(input.trim().to_string())
}

fn check_for_command(input: &str) -> UserCommands {
    match input.to_lowercase().as_str() {
        "add" => UserCommands::Add,
        "update" | "edit" => UserCommands::Update,
        "remove" | "delete" => UserCommands::Remove,
        "print" | "list" => UserCommands::Print,
        "search" => UserCommands::Search,
        "filter" => UserCommands::Filter,
        "summary" => UserCommands::Summary,
        "categories" => UserCommands::Categories,
        "weekly" => UserCommands::Weekly,
        "monthly" => UserCommands::Monthly,
        "import" => UserCommands::Import,
        "dashboard" => UserCommands::Dashboard,
        "exit" | "quit" => UserCommands::Exit,
        _ => UserCommands::Unknown,
    }
}
