// Money Manager - Core Library
// Per-person cash balances + transaction history, persisted as flat strings.
// Shared by the terminal app, the API server and the tests.

pub mod models;
pub mod clock;
pub mod ledger;   // Pure state transitions
pub mod codec;    // Flat delimited encoding
pub mod storage;  // Key/value backends
pub mod store;    // Current snapshot + persist-on-change
pub mod config;
pub mod export;

// Re-export commonly used types
pub use models::{Person, Transaction, TransactionKind};
pub use clock::{format_date, Clock, FixedClock, SystemClock, DATE_FORMAT};
pub use ledger::{parse_amount, Ledger, LedgerError};
pub use codec::{
    decode_persons, decode_transactions, encode_persons, encode_transactions,
    is_encodable, FIELD_DELIMITER, RECORD_DELIMITER,
};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, DEFAULT_NAMESPACE};
pub use store::{Change, LedgerStore, MutationObserver, StorageKeys};
pub use config::AppConfig;
pub use export::export_transactions_csv;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Open the SQLite-backed store described by `config`, stamped with the system clock
pub fn open_store(config: &AppConfig) -> anyhow::Result<LedgerStore<SqliteStore>> {
    let storage = SqliteStore::open(&config.db_path, &config.namespace)?;
    LedgerStore::open(storage, Box::new(SystemClock), StorageKeys::from(config))
}

/// Install the `RUST_LOG`-driven subscriber used by both binaries.
///
/// Logs go to stderr, or to `log_file` when given (the TUI owns the terminal).
pub fn init_logging(log_file: Option<&std::path::Path>) -> anyhow::Result<()> {
    use anyhow::Context;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("money_manager=info,money_server=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    // A second init (tests, embedding) keeps the first subscriber
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {:?}", path))?;
            let _ = builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }

    Ok(())
}
