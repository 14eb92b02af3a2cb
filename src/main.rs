//! Split Ledger CLI
//!
//! Loads users and expense requests from CSV files, then answers one query
//! against the resulting ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --users users.csv expenses.csv balance u1 > balance.json
//! cargo run -- --users users.csv expenses.csv balance u1 --format pdf --output exports/
//! cargo run -- --users users.csv --strategy sync expenses.csv expenses alice@example.com --page 2
//! cargo run -- --users users.csv --batch-size 500 --max-concurrent 8 expenses.csv overall
//! ```
//!
//! Rejected expense requests are logged to stderr with their line number and
//! do not stop the load. Query output goes to stdout.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unreadable input, invalid users file, unknown user, etc.)

use split_ledger::cli;
use split_ledger::strategy;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = cli::parse_args();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|e| {
        eprintln!("Invalid log filter '{}' ({}), using 'info'", args.log_level, e);
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let outcome = match strategy.load(&args.users_file, &args.expenses_file) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(status = e.status_code(), error = %e, "failed to load ledger");
            process::exit(1);
        }
    };
    tracing::info!(
        accepted = outcome.report.accepted,
        rejected = outcome.report.rejected.len(),
        "ledger loaded"
    );

    let mut output = std::io::stdout().lock();
    if let Err(e) = cli::execute(&outcome.ledger, &args.command, &mut output) {
        tracing::error!(status = e.status_code(), error = %e, "command failed");
        process::exit(1);
    }
}
