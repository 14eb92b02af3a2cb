//! Balance sheet export
//!
//! Renders a [`BalanceSheet`] as CSV, PDF or JSON bytes in memory. Writing the
//! bytes somewhere is a separate step, see [`write_export`].

use crate::io::pdf::{render_pdf, TextLine};
use crate::types::{BalanceSheet, ExpenseId, LedgerError, SplitMethod, UserId};
use clap::ValueEnum;
use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const PDF_TITLE: &str = "Balance Sheet";

/// Output format for a balance sheet export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Pdf,
    Json,
}

impl ExportFormat {
    /// File extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
        }
    }

    /// MIME type a transport layer would send with the bytes
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Json => "application/json",
        }
    }
}

/// A rendered export, ready to be written or sent
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedExport {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonBalanceSheet {
    total_owed: Decimal,
    total_paid: Decimal,
    balances: BTreeMap<ExpenseId, JsonBalance>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonBalance {
    amount: Decimal,
    owed: Decimal,
    split_method: SplitMethod,
}

/// Download name for a subject's balance sheet, e.g. `balance_sheet_u1.pdf`
pub fn export_file_name(subject: &UserId, format: ExportFormat) -> String {
    format!("balance_sheet_{}.{}", subject, format.extension())
}

/// Render a balance sheet in the requested format
pub fn render_balance_sheet(
    sheet: &BalanceSheet,
    format: ExportFormat,
) -> Result<RenderedExport, LedgerError> {
    let bytes = match format {
        ExportFormat::Csv => render_csv(sheet)?,
        ExportFormat::Pdf => render_pdf(PDF_TITLE, &pdf_lines(sheet))?,
        ExportFormat::Json => render_json(sheet)?,
    };

    Ok(RenderedExport {
        file_name: export_file_name(&sheet.subject, format),
        content_type: format.content_type(),
        bytes,
    })
}

fn render_csv(sheet: &BalanceSheet) -> Result<Vec<u8>, LedgerError> {
    let mut writer = Writer::from_writer(Vec::new());

    writer
        .write_record(["Expense ID", "Total Amount", "Owed Amount", "Split Method"])
        .map_err(|e| LedgerError::export(format!("Failed to write CSV header: {}", e)))?;

    for entry in &sheet.entries {
        writer
            .write_record(&[
                entry.expense_id.to_string(),
                format!("{:.4}", entry.amount),
                format!("{:.4}", entry.owed),
                entry.split_method.to_string(),
            ])
            .map_err(|e| LedgerError::export(format!("Failed to write balance row: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| LedgerError::export(format!("Failed to flush CSV export: {}", e)))
}

fn render_json(sheet: &BalanceSheet) -> Result<Vec<u8>, LedgerError> {
    let body = JsonBalanceSheet {
        total_owed: sheet.total_owed,
        total_paid: sheet.total_paid,
        balances: sheet
            .entries
            .iter()
            .map(|entry| {
                (
                    entry.expense_id,
                    JsonBalance {
                        amount: entry.amount,
                        owed: entry.owed,
                        split_method: entry.split_method,
                    },
                )
            })
            .collect(),
    };

    serde_json::to_vec_pretty(&body)
        .map_err(|e| LedgerError::export(format!("Failed to serialize balance sheet: {}", e)))
}

fn pdf_lines(sheet: &BalanceSheet) -> Vec<TextLine> {
    let mut lines = vec![TextLine::new(PDF_TITLE, 20.0), TextLine::blank(12.0)];
    for entry in &sheet.entries {
        lines.push(TextLine::new(format!("Expense ID: {}", entry.expense_id), 12.0));
        lines.push(TextLine::new(format!("Amount: {:.4}", entry.amount), 12.0));
        lines.push(TextLine::new(format!("Owed: {:.4}", entry.owed), 12.0));
        lines.push(TextLine::new(format!("Split Method: {}", entry.split_method), 12.0));
        lines.push(TextLine::blank(12.0));
    }
    lines
}

/// Write export bytes to `path`
///
/// The bytes go to a temporary file in the destination directory that is
/// renamed over `path` once complete, so readers never see a partial file.
pub fn write_export(bytes: &[u8], path: &Path) -> Result<(), LedgerError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(path)
        .map_err(|e| LedgerError::export(format!("Failed to persist '{}': {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "export written");
    Ok(())
}
