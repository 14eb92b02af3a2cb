use crate::io::ExportFormat;
use crate::strategy::BatchConfig;
use crate::types::{LedgerError, Page};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Split shared expenses and report who owes what
#[derive(Parser, Debug)]
#[command(name = "split-ledger")]
#[command(about = "Split shared expenses and report who owes what", long_about = None)]
pub struct CliArgs {
    /// Expense requests CSV (amount,participants,split_method,splits)
    #[arg(value_name = "EXPENSES", help = "Path to the expense requests CSV file")]
    pub expenses_file: PathBuf,

    /// Registered users CSV (uid,email,name,mobile)
    #[arg(
        long = "users",
        value_name = "USERS",
        env = "SPLIT_LEDGER_USERS",
        help = "Path to the users CSV file"
    )]
    pub users_file: PathBuf,

    /// Processing strategy used to load the expense requests
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for batched"
    )]
    pub strategy: StrategyType,

    /// Number of requests per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of expense requests per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads preparing requests (default: CPU cores)"
    )]
    pub max_concurrent: Option<usize>,

    /// Log filter, e.g. `info` or `split_ledger=debug`
    #[arg(
        long = "log-level",
        value_name = "FILTER",
        env = "SPLIT_LEDGER_LOG",
        default_value = "info"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Query to run once the ledger is loaded
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Balance sheet for a user, optionally exported to a file
    Balance {
        /// UID of the user
        uid: String,

        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// File or directory to write the export to (stdout if omitted)
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Paginated expenses of a user
    Expenses {
        /// Email of the user
        email: String,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = Page::DEFAULT_LIMIT)]
        limit: u32,
    },

    /// Every stored expense
    Overall,

    /// Details of a registered user
    User {
        /// UID of the user
        uid: String,
    },
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments, falling back to defaults
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent.unwrap_or(default.worker_threads),
            )
        } else {
            BatchConfig::default()
        }
    }
}

impl Command {
    /// Validated page for the `expenses` command
    pub fn page(&self) -> Result<Option<Page>, LedgerError> {
        match self {
            Command::Expenses { page, limit, .. } => Page::new(*page, *limit).map(Some),
            _ => Ok(None),
        }
    }
}
