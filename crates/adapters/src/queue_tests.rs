// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn commands(submit: &str, status: &str, delete: &str) -> QueueCommands {
    QueueCommands {
        submit: submit.to_string(),
        status: status.to_string(),
        delete: delete.to_string(),
        handle_pattern: None,
    }
}

fn request(command: &str) -> SubmitRequest {
    SubmitRequest {
        command: command.to_string(),
        working_directory: PathBuf::from("/tmp/calc/job_0"),
        job_name: "job_0".to_string(),
        cores: 2,
    }
}

#[tokio::test]
async fn submit_takes_last_output_line_as_handle() {
    let queue =
        CommandQueueAdapter::new(commands("echo queued; echo 4711", "true", "true")).unwrap();
    let handle = queue.submit(&request("sw run --path x")).await.unwrap();
    assert_eq!(handle.as_str(), "4711");
}

#[tokio::test]
async fn submit_uses_handle_pattern() {
    let mut cmds = commands("echo 'Submitted batch job 42 on cluster'", "true", "true");
    cmds.handle_pattern = Some(r"job (\d+)".to_string());
    let queue = CommandQueueAdapter::new(cmds).unwrap();

    assert_eq!(queue.submit(&request("x")).await.unwrap().as_str(), "42");
}

#[tokio::test]
async fn submit_substitutes_escaped_request_fields() {
    let queue = CommandQueueAdapter::new(commands(
        "printf '%s|%s|%s|%s' '${job_name}' '${cores}' '${working_directory}' '${command}'",
        "true",
        "true",
    ))
    .unwrap();

    let handle = queue.submit(&request("echo 'quoted'")).await.unwrap();

    assert_eq!(handle.as_str(), "job_0|2|/tmp/calc/job_0|echo 'quoted'");
}

#[tokio::test]
async fn submit_failure_and_empty_output() {
    let queue =
        CommandQueueAdapter::new(commands("echo nope >&2; exit 4", "true", "true")).unwrap();
    let err = queue.submit(&request("x")).await.unwrap_err();
    assert!(matches!(
        err,
        QueueError::CommandFailed { action: "submit", exit_code: 4, ref stderr } if stderr == "nope"
    ));

    let queue = CommandQueueAdapter::new(commands("true", "true", "true")).unwrap();
    assert!(matches!(queue.submit(&request("x")).await.unwrap_err(), QueueError::NoHandle(_)));
}

#[test]
fn invalid_pattern_is_rejected() {
    let mut cmds = commands("true", "true", "true");
    cmds.handle_pattern = Some("(".to_string());
    assert!(matches!(CommandQueueAdapter::new(cmds).unwrap_err(), QueueError::InvalidPattern(_)));
}

#[tokio::test]
async fn status_maps_output_per_handle() {
    let queue = CommandQueueAdapter::new(commands(
        "true",
        "case '${handle}' in 1) echo R ;; 2) echo PD ;; *) exit 1 ;; esac",
        "true",
    ))
    .unwrap();

    let states = queue
        .status(&[QueueHandle::new("1"), QueueHandle::new("2"), QueueHandle::new("3")])
        .await
        .unwrap();

    assert_eq!(states, vec![QueueState::Running, QueueState::Pending, QueueState::Finished]);
}

#[tokio::test]
async fn delete_reports_failure() {
    let queue = CommandQueueAdapter::new(commands("true", "true", "test '${handle}' = 7")).unwrap();
    queue.delete(&QueueHandle::new("7")).await.unwrap();
    let err = queue.delete(&QueueHandle::new("8")).await.unwrap_err();
    assert!(matches!(err, QueueError::CommandFailed { action: "delete", .. }));
}

#[tokio::test]
async fn fake_queue_tracks_submissions() {
    let queue = FakeQueueAdapter::new();
    let first = queue.submit(&request("a")).await.unwrap();
    let second = queue.submit(&request("b")).await.unwrap();
    assert_eq!((first.as_str(), second.as_str()), ("1", "2"));

    queue.set_state(&first, QueueState::Running);
    queue.delete(&second).await.unwrap();

    let states = queue.status(&[first.clone(), second.clone()]).await.unwrap();
    assert_eq!(states, vec![QueueState::Running, QueueState::Finished]);
    assert_eq!(queue.deleted(), vec![second]);
    assert_eq!(queue.submitted()[0].1.command, "a");
}

#[yare::parameterized(
    last_line       = { None,                 "queued\n17\n\n",         Some("17") },
    trimmed         = { None,                 "  9  ",                  Some("9") },
    pattern         = { Some(r"job (\d+)"),   "Submitted job 42\n",     Some("42") },
    pattern_missing = { Some(r"job (\d+)"),   "Submitted\n",            None },
    blank           = { None,                 "\n \n",                  None },
)]
fn handle_parsing(pattern: Option<&str>, stdout: &str, expected: Option<&str>) {
    let mut cmds = commands("true", "true", "true");
    cmds.handle_pattern = pattern.map(str::to_string);
    let queue = CommandQueueAdapter::new(cmds).unwrap();
    let parsed = queue.parse_handle(stdout).ok();
    assert_eq!(parsed.as_ref().map(QueueHandle::as_str), expected);
}
