//! Terminal dashboard demo for the Agakayi SDK.
//!
//! The CLI analog of the web dashboard: log in, list and filter
//! transactions, add and delete records, and render the summary cards,
//! the category breakdown and the CSV export in a terminal.

use agakayi_sdk::models::{Category, Transaction, TransactionDraft, TransactionType};
use agakayi_sdk::pipeline::{CategoryShare, Filter, SortKey, SortOrder, Summary};
use agakayi_sdk::{export, AgakayiSdk, Ledger, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, CellAlignment, Color, Table, TableComponent};

#[derive(Parser)]
#[clap(author, version, about = "Agakayi terminal dashboard", long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// API base URL (defaults to AGAKAYI_API_URL or the hosted API)
    #[clap(long)]
    api_url: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with email and password
    Login {
        email: String,
        /// Password (prompted when omitted)
        #[clap(long)]
        password: Option<String>,
    },
    /// Create an account and log straight in
    Register {
        username: String,
        email: String,
        #[clap(long)]
        password: Option<String>,
    },
    /// Forget the current session
    Logout,
    /// Show the logged-in identity
    Whoami,
    /// List transactions, filtered and sorted
    List {
        #[clap(long)]
        category: Option<String>,
        /// Inclusive lower date bound (YYYY-MM-DD)
        #[clap(long)]
        from: Option<String>,
        /// Inclusive upper date bound (YYYY-MM-DD)
        #[clap(long)]
        to: Option<String>,
        /// Sort key: date, amount or title
        #[clap(long, default_value = "date")]
        sort: String,
        /// Sort order: asc or desc
        #[clap(long, default_value = "desc")]
        order: String,
    },
    /// Add a transaction
    Add {
        title: String,
        /// Positive magnitude; the type decides the sign
        amount: f64,
        /// YYYY-MM-DD
        #[clap(long)]
        date: String,
        #[clap(long, default_value = "expense")]
        kind: String,
        #[clap(long, default_value = "Other")]
        category: String,
        #[clap(long)]
        note: Option<String>,
    },
    /// Delete a transaction by id
    Rm { id: String },
    /// Show the income/expense/balance summary cards
    Summary,
    /// Show the per-category expense breakdown
    Breakdown,
    /// Export the filtered + sorted view as CSV
    Export {
        path: String,
        #[clap(long)]
        category: Option<String>,
        #[clap(long)]
        from: Option<String>,
        #[clap(long)]
        to: Option<String>,
        #[clap(long, default_value = "date")]
        sort: String,
        #[clap(long, default_value = "desc")]
        order: String,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut builder = AgakayiSdk::builder();
    if let Some(url) = cli.api_url {
        builder = builder.api_url(url);
    }
    let sdk = builder.build()?;

    match cli.command {
        Command::Login { email, password } => {
            let password = password_or_prompt(password)?;
            let user = sdk.auth().login(&email, &password)?;
            println!("Logged in as {} <{}>", user.username, user.email);
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            let password = password_or_prompt(password)?;
            let user = sdk.auth().register(&username, &email, &password)?;
            println!("Registered and logged in as {} <{}>", user.username, user.email);
        }
        Command::Logout => {
            sdk.auth().logout()?;
            println!("Logged out");
        }
        Command::Whoami => match sdk.auth().current_identity() {
            Some(user) => println!("{} <{}>", user.username, user.email),
            None => println!("Not logged in"),
        },
        Command::List {
            category,
            from,
            to,
            sort,
            order,
        } => {
            let ledger = Ledger::load(&sdk.transactions())?;
            let view = ledger.view(
                &parse_filter(category, from, to)?,
                sort.parse::<SortKey>()?,
                order.parse::<SortOrder>()?,
            );
            print_transactions(&view);
        }
        Command::Add {
            title,
            amount,
            date,
            kind,
            category,
            note,
        } => {
            let draft = TransactionDraft {
                title,
                amount,
                kind: kind.parse()?,
                category: category.parse()?,
                date,
                note,
            };
            let created = sdk.transactions().create(&draft)?;
            println!("Added {} ({})", created.title, created.id);
        }
        Command::Rm { id } => {
            sdk.transactions().delete(&id)?;
            println!("Deleted {id}");
        }
        Command::Summary => {
            let ledger = Ledger::load(&sdk.transactions())?;
            print_summary(&ledger.summary());
        }
        Command::Breakdown => {
            let ledger = Ledger::load(&sdk.transactions())?;
            print_breakdown(&ledger.breakdown());
        }
        Command::Export {
            path,
            category,
            from,
            to,
            sort,
            order,
        } => {
            let ledger = Ledger::load(&sdk.transactions())?;
            let view = ledger.view(
                &parse_filter(category, from, to)?,
                sort.parse::<SortKey>()?,
                order.parse::<SortOrder>()?,
            );
            export::write_csv_path(&view, &path)?;
            println!("Exported {} transactions to {path}", view.len());
        }
    }

    Ok(())
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => Ok(rpassword::prompt_password("Password: ")?),
    }
}

fn parse_filter(
    category: Option<String>,
    from: Option<String>,
    to: Option<String>,
) -> Result<Filter> {
    Ok(Filter {
        category: category.map(|c| c.parse::<Category>()).transpose()?,
        date_from: from,
        date_to: to,
    })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn base_table() -> Table {
    let mut table = Table::new();
    table.remove_style(TableComponent::HorizontalLines);
    table.remove_style(TableComponent::MiddleIntersections);
    table.remove_style(TableComponent::LeftBorderIntersections);
    table.remove_style(TableComponent::RightBorderIntersections);
    table
}

fn amount_cell(amount: f64, kind: TransactionType) -> Cell {
    let color = match kind {
        TransactionType::Income => Color::Green,
        TransactionType::Expense => Color::Red,
    };
    Cell::new(format_amount(amount))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

fn print_transactions(transactions: &[Transaction]) {
    let mut table = base_table();
    table.set_header(vec!["ID", "Date", "Title", "Category", "Type", "Amount"]);

    for t in transactions {
        table.add_row(vec![
            Cell::new(t.id.as_str()),
            Cell::new(t.date.as_str()),
            Cell::new(t.title.as_str()),
            Cell::new(t.category.as_str()),
            Cell::new(t.kind.as_str()),
            amount_cell(t.amount, t.kind),
        ]);
    }

    println!("{table}");
    println!("{} transaction(s)", transactions.len());
}

fn print_summary(summary: &Summary) {
    let mut table = base_table();
    table.set_header(vec!["Total Income", "Total Expenses", "Balance"]);

    let balance_color = if summary.balance >= 0.0 {
        Color::Blue
    } else {
        Color::DarkYellow
    };
    table.add_row(vec![
        Cell::new(format_amount(summary.total_income))
            .fg(Color::Green)
            .set_alignment(CellAlignment::Right),
        Cell::new(format_amount(summary.total_expenses))
            .fg(Color::Red)
            .set_alignment(CellAlignment::Right),
        Cell::new(format_amount(summary.balance))
            .fg(balance_color)
            .set_alignment(CellAlignment::Right),
    ]);

    println!("{table}");
}

fn print_breakdown(breakdown: &[CategoryShare]) {
    if breakdown.is_empty() {
        println!("No expense data");
        return;
    }

    let mut table = base_table();
    table.set_header(vec!["Category", "Amount", "Share"]);

    for share in breakdown {
        table.add_row(vec![
            Cell::new(share.category.as_str()),
            Cell::new(format_amount(share.amount)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", share.percentage)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{table}");
}

/// Format $ amount
fn format_amount(amount: f64) -> String {
    format!("${amount:.2}")
}
