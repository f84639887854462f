use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn lmc() -> Command {
    Command::cargo_bin("lmc").unwrap()
}

#[test]
fn runs_without_arguments() {
    lmc().assert().success().stdout(contains("lmc v"));
}

#[test]
fn prints_constant_three_times() {
    lmc()
        .arg("run")
        .arg("tests/files/three.lmc")
        .arg("--minimal")
        .assert()
        .success()
        .stdout(contains("42\n42\n42\n"))
        .stdout(contains("Halted"));
}

#[test]
fn runs_path_without_subcommand() {
    lmc()
        .arg("tests/files/three.lmc")
        .assert()
        .success()
        .stdout(contains("42\n42\n42\n"));
}

#[test]
fn echoes_argument_input() {
    lmc()
        .args(["run", "tests/files/echo.lmc", "--minimal", "-i", "-7"])
        .assert()
        .success()
        .stdout(contains("-7\n"))
        .stdout(contains("Halted"));
}

#[test]
fn echoes_piped_input() {
    lmc()
        .args(["run", "tests/files/echo.lmc", "--minimal"])
        .write_stdin("\n  123\n")
        .assert()
        .success()
        .stdout(contains("123\n"))
        .stdout(contains("Halted"));
}

#[test]
fn rejects_out_of_range_piped_input() {
    lmc()
        .args(["run", "tests/files/echo.lmc", "--minimal"])
        .write_stdin("1000\nfive\n5\n")
        .assert()
        .success()
        .stderr(contains("Invalid input `1000`"))
        .stderr(contains("Invalid input `five`"))
        .stdout(contains("5\n"));
}

#[test]
fn stops_when_input_runs_out() {
    lmc()
        .args(["run", "tests/files/echo.lmc", "--minimal"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(contains("waiting for input"))
        .stdout(contains("Halted").not());
}

#[test]
fn sums_until_negative() {
    lmc()
        .args(["run", "tests/files/sum.lmc", "--minimal"])
        .args(["-i", "3", "-i", "4", "--input", "-1"])
        .assert()
        .success()
        .stdout(contains("7\n"))
        .stdout(contains("Halted"));
}

#[test]
fn rejects_out_of_range_argument_input() {
    lmc()
        .args(["run", "tests/files/echo.lmc", "-i", "1000"])
        .assert()
        .failure();
}

#[test]
fn step_limit_stops_endless_loop() {
    lmc()
        .args(["run", "tests/files/loop.lmc", "--minimal"])
        .env("LMC_STEP_LIMIT", "50")
        .assert()
        .success()
        .stdout(contains("step limit of 50 reached"));
}

#[test]
fn reports_undefined_label() {
    lmc()
        .args(["check", "tests/files/undefined.lmc"])
        .assert()
        .failure()
        .stderr(contains("Undefined label `NOWHERE`"));

    lmc()
        .args(["run", "tests/files/undefined.lmc"])
        .assert()
        .failure()
        .stderr(contains("NOWHERE"));
}

#[test]
fn checks_valid_program() {
    lmc()
        .args(["check", "tests/files/sum.lmc"])
        .assert()
        .success()
        .stdout(contains("no errors found"));
}

#[test]
fn compiles_word_list() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("three.words");
    lmc()
        .arg("compile")
        .arg("tests/files/three.lmc")
        .arg(&dest)
        .assert()
        .success()
        .stdout(contains("Saved"));

    let words = fs::read_to_string(&dest).unwrap();
    assert_eq!(words, fs::read_to_string("tests/files/three.words").unwrap());
}

#[test]
fn runs_word_list() {
    lmc()
        .args(["run", "tests/files/three.words", "--minimal"])
        .assert()
        .success()
        .stdout(contains("42\n42\n42\n"));
}

#[test]
fn prints_listing() {
    lmc()
        .args(["listing", "tests/files/sum.lmc"])
        .assert()
        .success()
        .stdout(contains("00  901  START      IN"))
        .stdout(contains("01  805             BRP 05"))
        .stdout(contains("SUM        08"));
}

#[test]
fn rejects_unknown_extension() {
    lmc()
        .args(["run", "Cargo.toml"])
        .assert()
        .failure()
        .stderr(contains("unknown extension"));
}
