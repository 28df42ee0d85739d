//! Raw holdings table model.
//!
//! A [`HoldingsTable`] is the loader's output: ordered column names plus rows
//! of raw string fields. It carries no typing; cleaning happens downstream.

/// One tabular dataset loaded from a holdings export.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingsTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl HoldingsTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }

    /// Field at (row, column), if present. Rows shorter than the header are
    /// treated as having empty trailing fields.
    pub fn field(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).map(|r| {
            r.get(col).map(|s| s.as_str()).unwrap_or("")
        })
    }

    /// First `n` rows, for diagnostics.
    pub fn preview(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..self.rows.len().min(n)]
    }
}

/// A holding that survived the cleaning pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanHolding {
    pub country: String,
    pub weight: f64,
}
