// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    empty          = { "",            QueueState::Finished },
    slurm_pending  = { "PD",          QueueState::Pending },
    slurm_running  = { "R\n",         QueueState::Running },
    slurm_done     = { "CD",          QueueState::Finished },
    sge_waiting    = { "qw",          QueueState::Pending },
    sge_error      = { "Eqw",         QueueState::Failed },
    long_running   = { "running",     QueueState::Running },
    long_pending   = { "  Pending ",  QueueState::Pending },
    unknown        = { "suspended",   QueueState::Unknown },
)]
fn parse_cases(text: &str, expected: QueueState) {
    assert_eq!(QueueState::parse(text), expected);
}

#[test]
fn active_states() {
    assert!(QueueState::Pending.is_active());
    assert!(QueueState::Running.is_active());
    assert!(!QueueState::Finished.is_active());
    assert!(!QueueState::Failed.is_active());
    assert!(!QueueState::Unknown.is_active());
}

#[test]
fn state_display_matches_serde() {
    for state in [QueueState::Pending, QueueState::Running, QueueState::Finished] {
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, format!("\"{state}\""));
    }
}

#[test]
fn handle_is_transparent() {
    let handle = QueueHandle::from("4711");
    assert_eq!(handle.to_string(), "4711");
    assert_eq!(serde_json::to_string(&handle).unwrap(), "\"4711\"");
}
