// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job snapshot persistence.
//!
//! Every job directory holds one JSON record with the job's input, its
//! settings (executable, directory, recipe references) and, once the job has
//! completed, its output. The record is the only thing another process needs
//! to reconstruct the job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fs;
use std::path::{Path, PathBuf};
use sw_core::{ParamMap, RecipeRef};
use thiserror::Error;

/// File name of the snapshot inside a job directory.
pub const SNAPSHOT_FILE: &str = "sweeper.json";

/// Current snapshot schema version
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

/// Sections replaced whole on save instead of merged key by key.
const ATOMIC_SECTIONS: &[&str] = &["input", "output"];

/// Settings entries replaced whole; a recipe reference never mixes parameters
/// from two kinds.
const ATOMIC_SETTINGS: &[&str] = &["write_input_source", "collect_output_source"];

/// Errors that can occur in snapshot operations
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("no snapshot found at {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt snapshot {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SnapshotError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        SnapshotError::Io { path: path.to_path_buf(), source }
    }
}

/// Settings section of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSettings {
    pub executable: String,
    pub working_directory: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_input_source: Option<RecipeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collect_output_source: Option<RecipeRef>,
}

/// The durable record of one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    /// Schema version for migrations
    #[serde(rename = "v", default = "current_version")]
    pub version: u32,
    #[serde(default)]
    pub input: ParamMap,
    pub settings: JobSettings,
    /// Present only once the job has completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ParamMap>,
    /// Stamped by [`save`]; ignored when passed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn current_version() -> u32 {
    CURRENT_SNAPSHOT_VERSION
}

impl JobSnapshot {
    pub fn new(input: ParamMap, settings: JobSettings) -> Self {
        Self {
            version: CURRENT_SNAPSHOT_VERSION,
            input,
            settings,
            output: None,
            updated_at: None,
        }
    }

    /// Whether the record marks a completed job.
    pub fn is_complete(&self) -> bool {
        self.output.as_ref().is_some_and(|o| !o.is_empty())
    }
}

/// Path of the snapshot file for a job directory.
pub fn snapshot_path(working_directory: &Path) -> PathBuf {
    working_directory.join(SNAPSHOT_FILE)
}

pub fn exists(working_directory: &Path) -> bool {
    snapshot_path(working_directory).is_file()
}

/// Load the snapshot stored in `working_directory`.
pub fn load(working_directory: &Path) -> Result<JobSnapshot, SnapshotError> {
    let path = snapshot_path(working_directory);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SnapshotError::NotFound(path))
        }
        Err(e) => return Err(SnapshotError::io(&path, e)),
    };
    serde_json::from_str(&text).map_err(|source| SnapshotError::Corrupt { path, source })
}

/// Write `snapshot` into `working_directory`, merging with any existing record.
///
/// Sections present in `snapshot` overwrite what is on disk; sections it
/// leaves out (for instance `output` on a job that has not completed) keep
/// their stored value. `settings` merges key by key except for the recipe
/// references, which like `input` and `output` are replaced whole. The write
/// goes through a temp file and a rename.
pub fn save(working_directory: &Path, snapshot: &JobSnapshot) -> Result<(), SnapshotError> {
    let path = snapshot_path(working_directory);
    let mut record = serde_json::to_value(snapshot)?;
    if let Json::Object(ref mut map) = record {
        map.insert("updated_at".to_string(), serde_json::to_value(Utc::now())?);
    }

    let merged = match fs::read_to_string(&path) {
        Ok(text) => {
            let mut existing: Json = serde_json::from_str(&text)
                .map_err(|source| SnapshotError::Corrupt { path: path.clone(), source })?;
            if let (Json::Object(old), Json::Object(new)) = (&mut existing, &record) {
                remove_replaced(old, new, ATOMIC_SECTIONS);
                if let (Some(Json::Object(old)), Some(Json::Object(new))) =
                    (old.get_mut("settings"), new.get("settings"))
                {
                    remove_replaced(old, new, ATOMIC_SETTINGS);
                }
            }
            merge_json(&mut existing, record);
            existing
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => record,
        Err(e) => return Err(SnapshotError::io(&path, e)),
    };

    let bytes = serde_json::to_vec_pretty(&merged)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).map_err(|e| SnapshotError::io(&tmp, e))?;
    fs::rename(&tmp, &path).map_err(|e| SnapshotError::io(&path, e))?;
    tracing::debug!(path = %path.display(), "saved snapshot");
    Ok(())
}

fn remove_replaced(
    old: &mut serde_json::Map<String, Json>,
    new: &serde_json::Map<String, Json>,
    keys: &[&str],
) {
    for key in keys {
        if new.contains_key(*key) {
            old.remove(*key);
        }
    }
}

/// Recursively merge `patch` into `base`: objects merge key by key, any other
/// value replaces what was there.
pub fn merge_json(base: &mut Json, patch: Json) {
    match (base, patch) {
        (Json::Object(base_map), Json::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
