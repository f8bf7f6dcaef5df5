// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sw_core::params;

const MINIMAL: &str = r#"
root = "calc"
executable = "sh run.sh"
input_writer = { kind = "template", params = { file = "in", template = "${a}" } }
output_collector = { kind = "lines", params = { file = "out" } }
"#;

fn with(extra: &str) -> SweepConfig {
    SweepConfig::parse(&format!("{MINIMAL}\n{extra}")).unwrap()
}

#[test]
fn minimal_file_parses() {
    let config = with("");
    assert_eq!(config.executable, "sh run.sh");
    assert_eq!(config.input_writer.kind, "template");
    assert_eq!(config.input_writer.str_param("template").unwrap(), "${a}");
    assert!(config.queue.is_none());
    assert!(config.cores.is_none());
    assert!(config.expand_inputs().unwrap().is_empty());
    assert_eq!(config.namer().name(&params! {}, 3), "job_3");
}

#[test]
fn explicit_inputs_keep_their_types() {
    let config = with(
        r#"
[[inputs]]
a = 1
b = 2.5
c = "text"
d = [1, 2]
"#,
    );
    assert_eq!(
        config.expand_inputs().unwrap(),
        vec![params! { "a" => 1, "b" => 2.5, "c" => "text", "d" => vec![1, 2] }]
    );
}

#[test]
fn grid_expands_in_declaration_order() {
    let config = with(
        r#"
[grid]
z = [1, 2]
a = ["x", "y"]
"#,
    );
    let inputs = config.expand_inputs().unwrap();
    assert_eq!(
        inputs,
        vec![
            params! { "z" => 1, "a" => "x" },
            params! { "z" => 1, "a" => "y" },
            params! { "z" => 2, "a" => "x" },
            params! { "z" => 2, "a" => "y" },
        ]
    );
}

#[test]
fn defaults_sit_under_inputs_and_grid() {
    let config = with(
        r#"
[defaults]
a = 0
b = 7

[grid]
a = [1]

[[inputs]]
a = 5
"#,
    );
    assert_eq!(
        config.expand_inputs().unwrap(),
        vec![params! { "a" => 5, "b" => 7 }, params! { "a" => 1, "b" => 7 }]
    );
}

#[test]
fn empty_grid_values_are_rejected() {
    let config = with("[grid]\na = []\n");
    let err = config.expand_inputs().unwrap_err();
    assert!(matches!(err, ConfigError::EmptyGrid(ref n) if n == "a"));
}

#[test]
fn queue_section_flattens_commands() {
    let config = with(
        r#"
[queue]
submit = "sbatch --wrap '${command}'"
status = "squeue -h -j '${handle}' -o %t"
delete = "scancel '${handle}'"
handle_pattern = 'job (\d+)'
runner = "/usr/local/bin/sw"
"#,
    );
    let queue = config.queue.unwrap();
    assert_eq!(queue.commands.delete, "scancel '${handle}'");
    assert_eq!(queue.commands.handle_pattern.as_deref(), Some(r"job (\d+)"));
    assert_eq!(queue.runner.as_deref(), Some("/usr/local/bin/sw"));
}

#[test]
fn job_name_template() {
    let config = with(r#"job_name = "run_${index}_${a}""#);
    assert_eq!(config.namer().name(&params! { "a" => 4 }, 1), "run_1_4");
}

#[test]
fn unknown_key_is_rejected() {
    assert!(SweepConfig::parse(&format!("{MINIMAL}\ncore = 3\n")).is_err());
}

#[test]
fn load_resolves_root_against_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sweep.toml");
    std::fs::write(&path, MINIMAL).unwrap();

    let config = SweepConfig::load(&path).unwrap();

    assert_eq!(config.root, dir.path().join("calc"));
}

#[test]
fn load_reports_missing_and_invalid_files() {
    let dir = tempfile::tempdir().unwrap();
    let missing = SweepConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));

    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "root = ").unwrap();
    assert!(matches!(SweepConfig::load(&path).unwrap_err(), ConfigError::Parse { .. }));
}
