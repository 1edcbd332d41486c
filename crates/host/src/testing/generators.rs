//! Generators for synthetic summary data.

use crate::models::{Cell, Column, SummaryData};

/// Builds summary data shaped like a regional sales worksheet.
///
/// Columns: `Region`, `Product`, `Amount`, `Units`. `Amount` carries a
/// thousands separator in its formatted value, matching how hosts format
/// large numbers.
#[derive(Debug, Clone)]
pub struct SummaryGenerator {
    row_count: usize,
}

impl Default for SummaryGenerator {
    fn default() -> Self {
        Self { row_count: 10 }
    }
}

impl SummaryGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row_count(mut self, rows: usize) -> Self {
        self.row_count = rows;
        self
    }

    pub fn generate(&self) -> SummaryData {
        const REGIONS: [&str; 4] = ["East", "West", "North", "South"];

        let columns = ["Region", "Product", "Amount", "Units"]
            .into_iter()
            .map(Column::new)
            .collect();

        let rows = (0..self.row_count)
            .map(|i| {
                let amount = 1_000 + (i as u64 * 137) % 90_000;
                vec![
                    Cell::text(REGIONS[i % REGIONS.len()]),
                    Cell::text(format!("Product {i}")),
                    Cell::formatted(serde_json::json!(amount), group_thousands(amount)),
                    Cell::formatted(serde_json::json!(i % 50), (i % 50).to_string()),
                ]
            })
            .collect();

        SummaryData { columns, rows }
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
