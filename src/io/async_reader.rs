//! Asynchronous CSV reader with batch interface
//!
//! Provides batch reading over expense requests from any `futures` async
//! reader, so the async strategy can hand whole batches to the processor.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of RequestRecords
//!                  ↓
//!           csv_format module
//!           (CsvExpenseRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvExpenseRecord};
use crate::types::{LedgerError, RequestRecord};
use csv_async::{AsyncReaderBuilder, Position, StringRecord};
use futures::io::AsyncRead;

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncReader<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_reader(reader);

        Self { csv_reader }
    }

    /// Read a batch of expense requests
    ///
    /// Reads up to `batch_size` rows. Rows that fail to parse are logged and
    /// returned as errors carrying their line number, so callers can report
    /// them alongside requests the service rejects.
    ///
    /// # Returns
    ///
    /// One entry per row read. An empty vector means end of input.
    pub async fn read_batch(
        &mut self,
        batch_size: usize,
    ) -> Vec<Result<RequestRecord, LedgerError>> {
        let mut batch = Vec::with_capacity(batch_size);

        while batch.len() < batch_size {
            let mut row = StringRecord::new();
            match self.csv_reader.read_record(&mut row).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    let line = self.csv_reader.position().line();
                    tracing::warn!(line, error = %e, "skipping unreadable expense row");
                    batch.push(Err(LedgerError::parse_error(Some(line), e.to_string())));
                    continue;
                }
            }
            // Line the record starts on, header being line 1
            let line = row.position().map_or(0, Position::line);

            let record = self
                .csv_reader
                .headers()
                .await
                .and_then(|headers| row.deserialize::<CsvExpenseRecord>(Some(headers)))
                .map_err(|e| LedgerError::parse_error(Some(line), e.to_string()))
                .and_then(|csv_record| {
                    convert_csv_record(csv_record)
                        .map_err(|e| LedgerError::parse_error(Some(line), e))
                })
                .map(|request| RequestRecord { line, request });

            if let Err(e) = &record {
                tracing::warn!(line, error = %e, "skipping malformed expense row");
            }
            batch.push(record);
        }

        batch
    }
}
