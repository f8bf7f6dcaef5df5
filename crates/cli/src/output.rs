// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use sw_engine::{BatchReport, ResultTable};

use crate::color;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Write the results table in `format`.
pub fn write_table(
    out: &mut impl Write,
    table: &ResultTable,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => out.write_all(table.render_text().as_bytes())?,
        OutputFormat::Json => writeln!(out, "{}", table.to_json()?)?,
        OutputFormat::Csv => table.write_csv(&mut *out)?,
    }
    Ok(())
}

/// Write the results table to `path`, or stdout when there is none.
pub fn emit_table(
    table: &ResultTable,
    format: OutputFormat,
    path: Option<&Path>,
) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let mut file = std::fs::File::create(path)?;
            write_table(&mut file, table, format)
        }
        None => write_table(&mut std::io::stdout().lock(), table, format),
    }
}

/// One line per job that needs attention.
pub fn broken_lines(broken: &[PathBuf]) -> Vec<String> {
    broken.iter().map(|dir| format!("broken: {}", dir.display())).collect()
}

/// Summary line plus one line per failed job.
pub fn report_lines(report: &BatchReport) -> Vec<String> {
    let failed = report.len() - report.succeeded();
    let summary = format!(
        "{} job(s): {} succeeded, {} failed",
        report.len(),
        report.succeeded(),
        failed
    );
    let mut lines = vec![color::header(&summary)];
    for (outcome, error) in report.failures() {
        let first_line = error.to_string().lines().next().unwrap_or_default().to_string();
        lines.push(format!("  {}: {}", color::failure(&outcome.name), first_line));
    }
    for outcome in &report.outcomes {
        if let Ok(Some(handle)) = &outcome.result {
            lines.push(format!("  {}: submitted as {}", outcome.name, handle));
        }
    }
    lines
}

pub fn eprint_lines(lines: &[String]) {
    for line in lines {
        eprintln!("{line}");
    }
}
