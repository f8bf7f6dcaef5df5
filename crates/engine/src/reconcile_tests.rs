// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use sw_core::params;
use sw_storage::{JobSettings, JobSnapshot};
use tempfile::TempDir;

fn write_job(root: &Path, name: &str, input: ParamMap, output: Option<ParamMap>) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    let settings = JobSettings {
        executable: "true".to_string(),
        working_directory: dir.clone(),
        write_input_source: None,
        collect_output_source: None,
    };
    let mut snapshot = JobSnapshot::new(input, settings);
    snapshot.output = output;
    sw_storage::save(&dir, &snapshot).unwrap();
    dir
}

#[test]
fn union_of_keys_fills_missing_and_flags_broken() {
    let tmp = TempDir::new().unwrap();
    let a = write_job(tmp.path(), "A", params! { "n" => 0 }, Some(params! { "x" => 1, "y" => 2 }));
    let b = write_job(
        tmp.path(),
        "B",
        params! { "n" => 1 },
        Some(params! { "x" => 1, "y" => 2, "z" => 3 }),
    );
    let c = write_job(tmp.path(), "C", params! { "n" => 2 }, None);

    let result = reconcile(&[a.clone(), b, c.clone()]).unwrap();

    assert_eq!(result.broken, vec![a, c]);
    assert_eq!(result.table.columns(), ["dir", "n", "x", "y", "z"]);
    assert_eq!(result.table.row_by_dir("A").unwrap().get("z"), Some(&Value::Null));
    assert_eq!(result.table.row_by_dir("B").unwrap().get("z"), Some(&Value::Int(3)));
    assert_eq!(result.table.row_by_dir("C").unwrap().get("x"), Some(&Value::Null));
    assert_eq!(result.table.row_by_dir("C").unwrap().get("n"), Some(&Value::Int(2)));
}

#[test]
fn uniform_jobs_are_not_broken() {
    let tmp = TempDir::new().unwrap();
    let dirs: Vec<_> = (0..3)
        .map(|i| {
            write_job(
                tmp.path(),
                &format!("job_{i}"),
                params! { "value" => i },
                Some(params! { "result" => i * 2 }),
            )
        })
        .collect();

    let result = reconcile(&dirs).unwrap();

    assert!(result.broken.is_empty());
    assert_eq!(result.table.len(), 3);
    assert_eq!(result.table.get(2, "result"), Some(&Value::Int(4)));
}

#[test]
fn output_key_shadows_input_key() {
    let tmp = TempDir::new().unwrap();
    let dir = write_job(tmp.path(), "job_0", params! { "v" => 1 }, Some(params! { "v" => 9 }));

    let result = reconcile(&[dir]).unwrap();

    assert_eq!(result.table.get(0, "v"), Some(&Value::Int(9)));
}

#[test]
fn no_jobs_gives_empty_table() {
    let result = reconcile(&[]).unwrap();
    assert!(result.table.is_empty());
    assert!(result.broken.is_empty());
}

#[test]
fn corrupt_snapshot_aborts() {
    let tmp = TempDir::new().unwrap();
    let good = write_job(tmp.path(), "job_0", params! {}, Some(params! { "r" => 1 }));
    let bad = tmp.path().join("job_1");
    fs::create_dir_all(&bad).unwrap();
    fs::write(bad.join(sw_storage::SNAPSHOT_FILE), "{").unwrap();

    let err = reconcile(&[good, bad]).unwrap_err();

    assert!(matches!(err, SnapshotError::Corrupt { .. }));
}

#[yare::parameterized(
    no_output      = { None,                                     true },
    partial_output = { Some(params! { "x" => 1 }),               true },
    same_keys      = { Some(params! { "x" => 5, "y" => 6 }),     false },
    extra_key      = { Some(params! { "x" => 1, "y" => 2, "z" => 3 }), false },
)]
fn second_job_is_broken_when_it_lacks_a_key(output: Option<ParamMap>, broken: bool) {
    let tmp = TempDir::new().unwrap();
    let first = write_job(tmp.path(), "job_0", params! {}, Some(params! { "x" => 1, "y" => 2 }));
    let second = write_job(tmp.path(), "job_1", params! {}, output);

    let result = reconcile(&[first.clone(), second.clone()]).unwrap();

    assert_eq!(result.broken.contains(&second), broken);
    // A key only the second job has makes the first one broken instead.
    let extra = result.table.columns().iter().any(|c| c == "z");
    assert_eq!(result.broken.contains(&first), extra);
}
