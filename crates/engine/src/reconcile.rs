// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation of job snapshots into one result table.
//!
//! Jobs of one sweep do not necessarily report the same keys: a job that
//! failed halfway may have no output at all, a newer executable may add a
//! result. Every row is padded to the union of all keys with
//! [`Value::Null`], and any job that needed padding is reported as broken.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use sw_core::{ParamMap, Value};
use sw_storage::SnapshotError;
use tracing::debug;

use crate::table::{ResultTable, DIR_COLUMN};

/// Table of all jobs plus the directories of the incomplete ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub table: ResultTable,
    pub broken: Vec<PathBuf>,
}

fn dir_name(dir: &Path) -> String {
    dir.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Build the result table for the job directories `dirs`.
///
/// Any snapshot that is missing or does not parse fails the whole call.
pub fn reconcile(dirs: &[PathBuf]) -> Result<Reconciliation, SnapshotError> {
    let mut rows = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let snapshot = sw_storage::load(dir)?;
        let mut row: ParamMap = snapshot.input;
        row.extend(snapshot.output.unwrap_or_default());
        row.insert(DIR_COLUMN.to_string(), Value::Str(dir_name(dir)));
        rows.push(row);
    }

    let keys: BTreeSet<String> = rows.iter().flat_map(|row| row.keys().cloned()).collect();

    let mut broken_names: Vec<String> = Vec::new();
    for row in &mut rows {
        let mut missing = false;
        for key in &keys {
            if !row.contains_key(key) {
                row.insert(key.clone(), Value::Null);
                missing = true;
            }
        }
        if missing {
            if let Some(Value::Str(name)) = row.get(DIR_COLUMN) {
                if !broken_names.contains(name) {
                    broken_names.push(name.clone());
                }
            }
        }
    }

    let broken: Vec<PathBuf> = broken_names
        .iter()
        .flat_map(|name| dirs.iter().filter(move |dir| dir_name(dir) == *name).cloned())
        .collect();
    debug!(jobs = rows.len(), broken = broken.len(), "reconciled snapshots");

    Ok(Reconciliation { table: ResultTable::new(rows), broken })
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
