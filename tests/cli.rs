//! Integration tests: the `kmc` binary
//!
//! A run that cannot progress is a fatal error for the command line tool:
//! it must exit non-zero and leave the output directory empty.

use std::path::Path;
use std::process::{Command, Output};

mod common;
use common::{growth_input, write_input};

fn kmc(input: &Path, output: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kmc"))
        .arg(input)
        .arg("-o")
        .arg(output)
        .args(["--seed", "1"])
        .args(extra)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_successful_run_writes_time_series() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "growth.in", &growth_input(4, 4, 2.0, 0.0));
    let out = dir.path().join("results");

    let output = kmc(&input, &out, &["--max-steps", "20", "--heights"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(out.join("growth.csv").exists());
    assert!(out.join("heights.dat").exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Events:      20"));
}

#[test]
fn test_zero_total_rate_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let source = "build_lattice SimpleCubic 4 4 10 Cu\n\
                  nspecies 1\n\
                  Cu 63.546\n\
                  nprocesses 1\n\
                  Cu + * -> Cu*, 0.0\n\
                  temperature 500\n\
                  time 1.0\n";
    let input = write_input(dir.path(), "stalled.in", source);
    let out = dir.path().join("results");

    let output = kmc(&input, &out, &[]);

    assert!(!output.status.success());
    assert!(!out.join("growth.csv").exists());
    assert!(String::from_utf8_lossy(&output.stderr).contains("total rate is zero"));
}

#[test]
fn test_exhausted_surface_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "evaporation.in", common::EVAPORATION);
    let out = dir.path().join("results");

    let output = kmc(&input, &out, &["--max-steps", "100"]);

    assert!(!output.status.success());
    assert!(!out.join("growth.csv").exists());
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results");

    let output = kmc(&dir.path().join("missing.in"), &out, &[]);

    assert!(!output.status.success());
    assert!(!out.exists());
}
