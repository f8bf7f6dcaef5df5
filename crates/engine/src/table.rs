// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tabular view of a sweep's results.

use std::io::Write;

use serde::Serialize;
use sw_core::{ParamMap, Value};
use thiserror::Error;

/// Column holding each job's directory name.
pub const DIR_COLUMN: &str = "dir";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One row per job; every row holds every column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<ParamMap>,
}

impl ResultTable {
    /// Build a table from rows that already share one key set.
    ///
    /// Columns are `dir` followed by the remaining keys in sorted order.
    pub fn new(rows: Vec<ParamMap>) -> Self {
        let mut columns = Vec::new();
        if rows.iter().any(|r| r.contains_key(DIR_COLUMN)) {
            columns.push(DIR_COLUMN.to_string());
        }
        if let Some(first) = rows.first() {
            columns.extend(first.keys().filter(|k| *k != DIR_COLUMN).cloned());
        }
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ParamMap] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        if !self.columns.iter().any(|c| c == name) {
            return None;
        }
        Some(self.rows.iter().map(|row| row.get(name).unwrap_or(&Value::Null)).collect())
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row)?.get(column)
    }

    /// The row of the job in directory `dir`.
    pub fn row_by_dir(&self, dir: &str) -> Option<&ParamMap> {
        self.rows.iter().find(|row| row.get(DIR_COLUMN).and_then(Value::as_str) == Some(dir))
    }

    fn cells(&self, row: &ParamMap) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| row.get(c).map(Value::to_string).unwrap_or_else(|| Value::Null.to_string()))
            .collect()
    }

    /// Plain-text table with space-padded columns.
    pub fn render_text(&self) -> String {
        if self.columns.is_empty() {
            return String::new();
        }
        let body: Vec<Vec<String>> = self.rows.iter().map(|r| self.cells(r)).collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| body.iter().map(|cells| cells[i].len()).fold(c.len(), usize::max))
            .collect();

        let mut out = String::new();
        let mut push_line = |cells: &[String]| {
            let line: Vec<String> =
                cells.iter().zip(&widths).map(|(cell, &w)| format!("{cell:<w$}")).collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        };
        push_line(&self.columns);
        for cells in &body {
            push_line(cells);
        }
        out
    }

    /// Rows as a JSON array of objects.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(&self.rows)?)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(self.cells(row))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
