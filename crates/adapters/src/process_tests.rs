// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn shell_runs_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("input_file"), "1 2 3").unwrap();

    let result = ShellProcessAdapter::new()
        .execute("cat input_file", dir.path())
        .await
        .unwrap();

    assert!(result.is_success());
    assert_eq!(result.output, "1 2 3");
}

#[tokio::test]
async fn shell_combines_stdout_and_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let result = ShellProcessAdapter::new()
        .execute("echo out; echo err >&2; exit 3", dir.path())
        .await
        .unwrap();

    assert_eq!(result.exit_code, 3);
    assert!(!result.is_success());
    assert!(result.output.contains("out"));
    assert!(result.output.contains("err"));
}

#[tokio::test]
async fn shell_missing_directory_is_spawn_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ShellProcessAdapter::new()
        .execute("true", &dir.path().join("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::Spawn { .. }));
}

#[tokio::test]
async fn fake_records_calls_and_runs_handler() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeProcessAdapter::with_handler(|command, cwd| {
        std::fs::write(cwd.join("output.log"), command).unwrap();
        ProcessOutput::failure(2, "boom")
    });

    let result = fake.execute("solve", dir.path()).await.unwrap();

    assert_eq!(result, ProcessOutput::failure(2, "boom"));
    assert_eq!(fake.call_count(), 1);
    assert_eq!(fake.calls()[0].command, "solve");
    assert_eq!(std::fs::read_to_string(dir.path().join("output.log")).unwrap(), "solve");
}
