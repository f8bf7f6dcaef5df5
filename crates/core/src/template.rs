// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `${name}` interpolation for input files, job names and queue commands.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::value::{ParamMap, Value};

/// Regex pattern for `${variable_name}`
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
pub static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// Escape a value for use inside a single-quoted shell word.
pub fn escape_for_shell(s: &str) -> String {
    s.replace('\'', "'\\''")
}

/// Replace `${name}` placeholders with the matching parameter value.
///
/// Values render through their `Display` impl, so strings appear without
/// quotes. Unknown names are left as-is.
pub fn interpolate(template: &str, vars: &ParamMap) -> String {
    interpolate_inner(template, |name| vars.get(name).map(Value::to_string), false)
}

/// Like [`interpolate`], but over plain string variables with shell escaping.
///
/// Used for queue command templates where the substituted values are paths
/// and job names.
pub fn interpolate_shell(template: &str, vars: &BTreeMap<&str, String>) -> String {
    interpolate_inner(template, |name| vars.get(name).cloned(), true)
}

fn interpolate_inner(
    template: &str,
    lookup: impl Fn(&str) -> Option<String>,
    shell_escape: bool,
) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| match lookup(&caps[1]) {
            Some(val) if shell_escape => escape_for_shell(&val),
            Some(val) => val,
            None => caps[0].to_string(),
        })
        .to_string()
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
