// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

/// Log filter directive: `SW_LOG` > `warn`
pub fn log_filter() -> String {
    std::env::var("SW_LOG").ok().filter(|s| !s.trim().is_empty()).unwrap_or_else(|| "warn".into())
}

/// Default local worker count when neither the flag nor the sweep file sets one.
pub fn default_cores() -> usize {
    std::env::var("SW_CORES")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

/// Program the queue invokes to run one job: `SW_RUNNER` > this executable > `sw`
pub fn runner() -> String {
    if let Ok(runner) = std::env::var("SW_RUNNER") {
        if !runner.trim().is_empty() {
            return runner;
        }
    }
    std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "sw".to_string())
}
