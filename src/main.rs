// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use money_manager::{export_transactions_csv, open_store, init_logging, AppConfig, Change};
use std::env;
use std::fs::File;

const USAGE: &str = "\
Usage: money-manager [COMMAND]

Commands:
  add <name>              Add a person (balance 0)
  in <name> <amount>      Record money in
  out <name> <amount>     Record money out
  delete <name>           Delete a person and its history
  list                    Show persons and the total balance
  history <name>          Show a person's transactions
  export <file.csv>       Write all transactions as CSV

Without a command the terminal UI starts.";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let config = AppConfig::load()?;

    if args.is_empty() {
        // UI mode (default)
        init_logging(Some(config.log_file.as_path()))?;
        return run_ui_mode(&config);
    }

    init_logging(None)?;
    run_command(&config, &args)
}

fn run_command(config: &AppConfig, args: &[String]) -> Result<()> {
    let arg = |i: usize| -> Result<&str> {
        args.get(i)
            .map(String::as_str)
            .with_context(|| format!("missing argument\n\n{}", USAGE))
    };

    let mut store = open_store(config)?;

    match args[0].as_str() {
        "add" => report(store.add_person(arg(1)?)?),
        "in" => report(store.money_in(arg(1)?, arg(2)?)?),
        "out" => report(store.money_out(arg(1)?, arg(2)?)?),
        "delete" => report(store.delete_person(arg(1)?)?),
        "list" => {
            for person in store.persons() {
                println!("{}: {}", person.name, config.money(person.balance));
            }
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!("Total Balance: {}", config.money(store.total_balance()));
        }
        "history" => {
            let name = arg(1)?;
            let Some(person) = store.ledger().person(name) else {
                bail!("no person named '{}'", name);
            };
            println!("{}: {}", person.name, config.money(person.balance));
            for tx in store.transactions_for(name) {
                println!("  {}", tx.history_line());
            }
        }
        "export" => {
            let path = arg(1)?;
            let file = File::create(path)
                .with_context(|| format!("Failed to create export file: {}", path))?;
            let count = export_transactions_csv(&store.ledger().transactions, file)?;
            println!("✓ Exported {} transactions to {}", count, path);
        }
        "help" | "--help" | "-h" => println!("{}", USAGE),
        other => bail!("unknown command '{}'\n\n{}", other, USAGE),
    }

    Ok(())
}

fn report(change: Change) {
    match change {
        Change::Applied => println!("✓ Saved"),
        Change::Ignored(reason) => println!("⚠️  Ignored: {}", reason),
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AppConfig) -> Result<()> {
    let store = open_store(config)?;

    let mut app = ui::App::new(store, config.currency_label.clone());
    ui::run_ui(&mut app)?;

    println!("✅ Saved to {:?}", config.db_path);

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use a command, see: money-manager help");
    std::process::exit(1);
}
