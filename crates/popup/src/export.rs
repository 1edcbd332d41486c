//! CSV export of worksheet summary data.
//!
//! Responsibilities:
//! - Turn host summary data into per-row records of normalized cell text.
//! - Render records as a CSV document with a header line.
//! - Derive the download file name and hand the document to file delivery.
//!
//! Does NOT handle:
//! - Fetching summary data from the host (see `runtime`).
//! - Streaming; the whole document is built in memory.
//!
//! Invariants:
//! - The header always comes from the column list, so zero rows still yield a header line.
//! - Values are written in column order; lines are joined by `\n` with no trailing newline.
//! - Record keys keep first-occurrence column order; a duplicate column name
//!   keeps the value of its last occurrence, and every position with that
//!   name renders that value.
//! - Thousands separators are removed by deleting every `,` from formatted
//!   values. Text cells that contain commas lose them too.

use datasource_config::constants::{CSV_MIME_TYPE, FALLBACK_EXPORT_STEM};
use datasource_config::{EmptyResultPolicy, PopupConfig, QuotePolicy};
use datasource_host::{FileDelivery, HostError, SummaryData};

use crate::error::{PopupError, Result};

/// Options controlling record normalization and CSV rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub quote_policy: QuotePolicy,
    pub empty_result_policy: EmptyResultPolicy,
    pub strip_thousands_separator: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from(&PopupConfig::default())
    }
}

impl From<&PopupConfig> for ExportOptions {
    fn from(config: &PopupConfig) -> Self {
        Self {
            quote_policy: config.quote_policy,
            empty_result_policy: config.empty_result_policy,
            strip_thousands_separator: config.strip_thousands_separator,
        }
    }
}

/// One exported row: column name to normalized cell text, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRecord {
    fields: Vec<(String, String)>,
}

impl ExportRecord {
    /// Set `column` to `value`. An existing key is overwritten in place.
    pub fn insert(&mut self, column: &str, value: String) {
        match self.fields.iter_mut().find(|(k, _)| k == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A finished CSV document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument(String);

impl CsvDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for CsvDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize_cell(formatted: &str, strip_thousands_separator: bool) -> String {
    if strip_thousands_separator {
        formatted.replace(',', "")
    } else {
        formatted.to_string()
    }
}

/// Zip every row with the column names positionally.
///
/// Cells past the last column are ignored. Short rows produce records
/// without the missing trailing columns.
pub fn to_records(data: &SummaryData, options: &ExportOptions) -> Vec<ExportRecord> {
    data.rows
        .iter()
        .map(|row| {
            let mut record = ExportRecord::default();
            for (column, cell) in data.columns.iter().zip(row) {
                record.insert(
                    &column.field_name,
                    normalize_cell(&cell.formatted_value, options.strip_thousands_separator),
                );
            }
            record
        })
        .collect()
}

/// Render records as CSV, header first, values in `columns` order.
pub fn to_document(
    records: &[ExportRecord],
    columns: &[String],
    options: &ExportOptions,
) -> Result<CsvDocument> {
    if columns.is_empty() {
        return Ok(CsvDocument(String::new()));
    }

    if let [column] = columns {
        return Ok(single_column_document(records, column, options.quote_policy));
    }

    let quote_style = match options.quote_policy {
        QuotePolicy::Necessary => csv::QuoteStyle::Necessary,
        QuotePolicy::Never => csv::QuoteStyle::Never,
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .quote_style(quote_style)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|c| record.get(c).unwrap_or("")))?;
    }

    let mut bytes = writer
        .into_inner()
        .map_err(|e| PopupError::Document(csv::Error::from(e.into_error())))?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }

    // Every field came from a `&str`, so the buffer is valid UTF-8.
    Ok(CsvDocument(String::from_utf8_lossy(&bytes).into_owned()))
}

/// One-column documents are written by hand: the `csv` writer renders a
/// record holding one empty field as `""`, which would not match a blank line.
fn single_column_document(
    records: &[ExportRecord],
    column: &str,
    quote_policy: QuotePolicy,
) -> CsvDocument {
    let lines: Vec<String> = std::iter::once(column)
        .chain(records.iter().map(|r| r.get(column).unwrap_or("")))
        .map(|value| single_field(value, quote_policy))
        .collect();
    CsvDocument(lines.join("\n"))
}

fn single_field(value: &str, quote_policy: QuotePolicy) -> String {
    let needs_quotes = quote_policy == QuotePolicy::Necessary
        && value.contains([',', '"', '\n', '\r']);
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Build the export document for `sheet_name`, applying the empty-result policy.
pub fn build_document(
    sheet_name: &str,
    data: &SummaryData,
    options: &ExportOptions,
) -> Result<CsvDocument> {
    if data.is_empty() && options.empty_result_policy == EmptyResultPolicy::Reject {
        return Err(PopupError::EmptyResult(sheet_name.to_string()));
    }

    let records = to_records(data, options);
    let document = to_document(&records, &data.column_names(), options)?;
    tracing::debug!(
        sheet = sheet_name,
        rows = records.len(),
        bytes = document.len(),
        "Built CSV export"
    );
    Ok(document)
}

/// Download file name for a worksheet.
///
/// Removes `marker`, replaces path separators, and appends `.{extension}`.
/// Falls back to `export` when nothing usable is left.
pub fn export_file_name(sheet_name: &str, marker: &str, extension: &str) -> String {
    let stripped = sheet_name.replace(marker, "");
    let stem: String = stripped
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    let stem = if stem.is_empty() || stem.chars().all(|c| c == '.') {
        FALLBACK_EXPORT_STEM.to_string()
    } else {
        stem
    };
    format!("{stem}.{}", extension.trim_start_matches('.'))
}

/// Hand `document` to the platform as a CSV download named `file_name`.
///
/// `file_name` should come from [`export_file_name`]. Delivery failures are
/// returned unchanged; nothing is retried.
pub async fn deliver<D: FileDelivery>(
    delivery: &mut D,
    document: CsvDocument,
    file_name: &str,
) -> std::result::Result<(), HostError> {
    let size = document.len();
    delivery
        .deliver(document.into_bytes(), CSV_MIME_TYPE, file_name)
        .await?;
    tracing::info!(file_name, bytes = size, "Export delivered");
    Ok(())
}
