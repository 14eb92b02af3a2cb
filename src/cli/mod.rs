// CLI module
// Command-line interface, argument parsing and command dispatch

mod args;

pub use args::{CliArgs, Command, StrategyType};

use crate::io::{render_balance_sheet, write_export};
use crate::strategy::Ledger;
use crate::types::{LedgerError, UserId};
use clap::Parser;
use serde::Serialize;
use std::io::Write;

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints the message and exits the
/// process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Run a query against a loaded ledger
///
/// Query results are written to `output` as JSON. Balance exports go to
/// `output` unless the command names a file or directory; a directory
/// receives the export under its default file name.
pub fn execute(ledger: &Ledger, command: &Command, output: &mut dyn Write) -> Result<(), LedgerError> {
    match command {
        Command::Balance {
            uid,
            format,
            output: destination,
        } => {
            let sheet = ledger.balance_sheet(&UserId::from(uid.as_str()))?;
            let export = render_balance_sheet(&sheet, *format)?;

            match destination {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(&export.file_name)
                    } else {
                        path.clone()
                    };
                    write_export(&export.bytes, &path)?;
                    tracing::info!(path = %path.display(), content_type = export.content_type, "balance sheet exported");
                }
                None => {
                    output.write_all(&export.bytes)?;
                    output.flush()?;
                }
            }
        }
        Command::Expenses { email, .. } => {
            let page = command.page()?.unwrap_or_default();
            write_json(&ledger.user_expenses(email, page)?, output)?;
        }
        Command::Overall => write_json(&ledger.overall_expenses()?, output)?,
        Command::User { uid } => {
            write_json(&ledger.user_details(&UserId::from(uid.as_str()))?, output)?
        }
    }

    Ok(())
}

fn write_json<T: Serialize + ?Sized>(value: &T, output: &mut dyn Write) -> Result<(), LedgerError> {
    serde_json::to_writer_pretty(&mut *output, value)
        .map_err(|e| LedgerError::export(format!("Failed to write JSON output: {}", e)))?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}
