//! Data handed from the host dashboard to the popup.
//!
//! Responsibilities:
//! - Define worksheets (selection candidates) and summary data (export input).
//! - Provide serde derives so fixtures and hosts can exchange them as JSON.
//!
//! Does NOT handle:
//! - Normalizing or exporting cell values (see the popup crate's export module).
//!
//! Invariants:
//! - Models are read-only views; the popup never mutates them.

use serde::{Deserialize, Serialize};

/// A worksheet on the host dashboard; one selectable data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worksheet {
    pub name: String,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Whether the worksheet name carries the eligibility marker.
    pub fn is_eligible(&self, marker: &str) -> bool {
        self.name.contains(marker)
    }

    /// Display label: the name with every occurrence of `marker` removed.
    pub fn label(&self, marker: &str) -> String {
        self.name.replace(marker, "")
    }
}

/// Column header of a summary data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub field_name: String,
}

impl Column {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
        }
    }
}

/// One cell of summary data.
///
/// `value` is the raw value; `formatted_value` is what the host displays
/// (e.g. `"1,200"` for `1200`). Exports use the formatted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(default)]
    pub value: serde_json::Value,
    pub formatted_value: String,
}

impl Cell {
    /// A cell whose raw and formatted values are the same text.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            value: serde_json::Value::String(value.clone()),
            formatted_value: value,
        }
    }

    pub fn formatted(value: serde_json::Value, formatted_value: impl Into<String>) -> Self {
        Self {
            value,
            formatted_value: formatted_value.into(),
        }
    }
}

/// Summary data of a worksheet: ordered columns and positionally aligned rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryData {
    pub columns: Vec<Column>,
    #[serde(rename = "data")]
    pub rows: Vec<Vec<Cell>>,
}

impl SummaryData {
    /// Build summary data from plain strings; each string is used as both
    /// the raw and the formatted value.
    pub fn from_text<C, R, S>(columns: C, rows: R) -> Self
    where
        C: IntoIterator<Item = S>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Column::new).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Cell::text).collect())
                .collect(),
        }
    }

    /// Column field names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.field_name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Options for a summary data request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOptions {
    /// Maximum number of rows the host may return.
    pub max_rows: usize,
}
