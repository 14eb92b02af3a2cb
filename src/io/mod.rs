//! I/O module
//!
//! Handles CSV parsing and balance sheet export.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (expense rows, user rows)
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface
//! - `export` - Balance sheet rendering (CSV, PDF, JSON) and file output
//! - `pdf` - Minimal PDF text document writer

pub mod async_reader;
pub mod csv_format;
pub mod export;
pub mod pdf;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{convert_csv_record, read_users_csv, CsvExpenseRecord};
pub use export::{export_file_name, render_balance_sheet, write_export, ExportFormat, RenderedExport};
pub use sync_reader::SyncReader;
