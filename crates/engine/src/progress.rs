// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress reporting for batch runs.

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// A bar over `total` jobs, or a hidden one when progress is off.
pub(crate) fn job_bar(total: usize, enabled: bool) -> ProgressBar {
    if !enabled || total == 0 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    bar.set_style(style);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_bar_is_hidden() {
        assert!(job_bar(10, false).is_hidden());
        assert!(job_bar(0, true).is_hidden());
    }

    #[test]
    fn template_parses() {
        assert!(ProgressStyle::default_bar().template(TEMPLATE).is_ok());
    }
}
