use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::application::{AppError, ExpenseService};
use crate::domain::{ExpenseInput, ExpenseItem, ExpenseItemList, format_cents, parse_cents};

/// Exit code for requests rejected by validation or lookups.
pub const EXIT_CLIENT_ERROR: i32 = 2;
/// Exit code for storage and other unexpected failures.
pub const EXIT_SERVER_ERROR: i32 = 1;

/// Expense Tracker - expenses and expense lists per owner
#[derive(Parser)]
#[command(name = "expense-tracker")]
#[command(about = "Track expenses and group them into per-owner expense lists")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "EXPENSE_TRACKER_DB", default_value = "expenses.db")]
    pub database: String,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(
        short,
        long,
        global = true,
        env = "EXPENSE_TRACKER_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Table
    )]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Expense management commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Expense list management commands
    #[command(subcommand)]
    List(ListCommands),
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Create {
        /// Owner email
        #[arg(short, long)]
        email: String,

        /// Short description
        #[arg(short, long)]
        title: String,

        /// Amount (e.g., "12.50" or "12")
        #[arg(short, long)]
        amount: Option<String>,
    },

    /// Show a single expense
    Show {
        /// Expense ID
        id: String,
    },

    /// List the expenses owned by an email
    List {
        /// Owner email
        #[arg(short, long)]
        email: String,
    },

    /// Change the title and amount of an expense
    Update {
        /// Expense ID
        id: String,

        /// New title
        #[arg(short, long)]
        title: String,

        /// New amount (omit to keep the current one)
        #[arg(short, long)]
        amount: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ListCommands {
    /// Create a new expense list
    Create {
        /// Owner email
        #[arg(short, long)]
        email: String,

        /// List title
        #[arg(short, long)]
        title: String,
    },

    /// Add an expense to a list
    Add {
        /// Expense list ID
        list_id: String,

        /// Expense ID
        item_id: String,
    },

    /// Remove an expense from a list
    Remove {
        /// Expense list ID
        list_id: String,

        /// Expense ID
        item_id: String,
    },

    /// Show the lists owned by an email, newest expenses first
    Show {
        /// Owner email
        #[arg(short, long)]
        email: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                ExpenseService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Expense(cmd) => {
                let service = ExpenseService::connect(&self.database).await?;
                run_expense_command(&service, cmd, self.format).await?;
            }

            Commands::List(cmd) => {
                let service = ExpenseService::connect(&self.database).await?;
                run_list_command(&service, cmd, self.format).await?;
            }
        }

        Ok(())
    }
}

/// Map a failed command to a process exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(app_err) if app_err.is_client_error() => EXIT_CLIENT_ERROR,
        _ => EXIT_SERVER_ERROR,
    }
}

/// Print a failed command to stderr and return its exit code.
///
/// Domain errors are printed as their JSON payload so scripts can parse them.
pub fn report_error(err: &anyhow::Error) -> i32 {
    let payload = err.downcast_ref::<AppError>().and_then(AppError::payload);
    match payload.map(|p| serde_json::to_string(&p)) {
        Some(Ok(json)) => eprintln!("{json}"),
        _ => eprintln!("Error: {err:#}"),
    }
    exit_code(err)
}

async fn run_expense_command(
    service: &ExpenseService,
    cmd: ExpenseCommands,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        ExpenseCommands::Create {
            email,
            title,
            amount,
        } => {
            let amount = parse_amount(amount.as_deref())?;
            let id = service
                .create_expense(&ExpenseInput::new(email, title, amount))
                .await?;
            println!("{id}");
        }

        ExpenseCommands::Show { id } => match service.get_expense_by_id(&id).await? {
            Some(item) => match format {
                OutputFormat::Json => print_json(&item)?,
                OutputFormat::Table => print_items(std::slice::from_ref(&item)),
            },
            None => println!("No expense found with id {id}."),
        },

        ExpenseCommands::List { email } => {
            let items = service.get_expenses_by_email(&email).await?;
            match format {
                OutputFormat::Json => print_json(&items)?,
                OutputFormat::Table if items.is_empty() => {
                    println!("No expenses found for {email}.")
                }
                OutputFormat::Table => print_items(&items),
            }
        }

        ExpenseCommands::Update { id, title, amount } => {
            let amount = parse_amount(amount.as_deref())?;
            // Email is not updatable; the payload field is left blank.
            let update = ExpenseInput::new(String::new(), title, amount);
            service.update_expense(&id, &update).await?;
            println!("Updated expense {id}");
        }

        ExpenseCommands::Delete { id } => {
            service.delete_expense(&id).await?;
            println!("Deleted expense {id}");
        }
    }

    Ok(())
}

async fn run_list_command(
    service: &ExpenseService,
    cmd: ListCommands,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        ListCommands::Create { email, title } => {
            let id = service.create_expense_list(&email, &title).await?;
            println!("{id}");
        }

        ListCommands::Add { list_id, item_id } => {
            service.add_expense_item_to_list(&list_id, &item_id).await?;
            println!("Added expense {item_id} to list {list_id}");
        }

        ListCommands::Remove { list_id, item_id } => {
            service
                .remove_expense_item_from_list(&list_id, &item_id)
                .await?;
            println!("Removed expense {item_id} from list {list_id}");
        }

        ListCommands::Show { email } => {
            let lists = service.get_expense_lists_by_email(&email).await?;
            match format {
                OutputFormat::Json => print_json(&lists)?,
                OutputFormat::Table if lists.is_empty() => {
                    println!("No expense lists found for {email}.")
                }
                OutputFormat::Table => print_lists(&lists),
            }
        }
    }

    Ok(())
}

fn parse_amount(amount: Option<&str>) -> Result<Option<i64>> {
    amount
        .map(|value| {
            parse_cents(value).map_err(|e| {
                anyhow::Error::from(AppError::invalid_data(format!(
                    "Invalid amount '{value}': {e}"
                )))
            })
        })
        .transpose()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn print_items(items: &[ExpenseItem]) {
    println!(
        "{:<36}  {:<24}  {:<24}  {:>10}",
        "ID", "DATE", "TITLE", "AMOUNT"
    );
    println!("{}", "-".repeat(100));
    for item in items {
        println!(
            "{:<36}  {:<24}  {:<24}  {:>10}",
            item.id,
            item.expense_date,
            truncate(&item.title, 24),
            item.amount.map(format_cents).unwrap_or_else(|| "-".into())
        );
    }
}

fn print_lists(lists: &[ExpenseItemList]) {
    for (index, list) in lists.iter().enumerate() {
        if index > 0 {
            println!();
        }
        println!("{} ({})", list.title, list.id);
        if list.items.is_empty() {
            println!("  (empty)");
        } else {
            print_items(&list.items);
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
