//! Output contract of the `check_hbase_cell` binary for invalid options.
//!
//! Every case here fails before any network I/O.

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_check_hbase_cell"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("CELLPROBE_HOST")
        .env_remove("CELLPROBE_PORT")
        .env_remove("CELLPROBE_TIMEOUT_SECS")
        .env_remove("CELLPROBE_PRECISION")
        .env_remove("CELLPROBE_TLS")
        .output()
        .expect("binary runs")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn clap_errors_print_one_unknown_line() {
    for args in [
        &["-P", "abc", "-T", "t", "-R", "r", "-C", "cf:q"][..],
        &["-P", "70000", "-T", "t", "-R", "r", "-C", "cf:q"][..],
        &["--bogus"][..],
    ] {
        let output = run(args);
        let lines = stdout_lines(&output);

        assert_eq!(output.status.code(), Some(3), "{args:?}");
        assert_eq!(lines.len(), 1, "{args:?}: {lines:?}");
        assert!(lines[0].starts_with("UNKNOWN: "), "{args:?}: {lines:?}");
        assert!(!output.stderr.is_empty(), "{args:?}");
    }
}

#[test]
fn usage_errors_name_the_cause_once() {
    let output = run(&["-T", "t", "-R", "r", "-C", "cf:q", "-w", "9:1"]);

    assert_eq!(output.status.code(), Some(3));
    assert_eq!(
        stdout_lines(&output),
        vec!["UNKNOWN: invalid warning threshold: threshold start 9 is greater than end 1"]
    );
}

#[test]
fn missing_option_is_unknown() {
    let output = run(&["-R", "r", "-C", "cf:q"]);

    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stdout_lines(&output), vec!["UNKNOWN: table not defined"]);
}
