use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn debug(file: &str, commands: &str) -> Command {
    let mut cmd = Command::cargo_bin("lmc").unwrap();
    cmd.arg("debug")
        .arg(file)
        .arg("--minimal")
        .arg("--command")
        .arg(commands);
    cmd
}

#[test]
fn steps_then_runs_to_completion() {
    debug(
        "tests/files/three.lmc",
        "step 2; get NUM; registers; quit",
    )
    .assert()
    .success()
    .stderr(contains("Executed 2 instructions."))
    .stderr(contains("ACC 42\nPC 2\nIR 902\nSTATUS ready\n"))
    .stdout(contains("42\n42\n42\n"))
    .stdout(contains("Halted"));
}

#[test]
fn pauses_at_breakpoint() {
    debug(
        "tests/files/three.lmc",
        "break add 3; break list; continue; registers; exit",
    )
    .assert()
    .success()
    .stderr(contains("Added breakpoint at 03."))
    .stderr(contains("Reached breakpoint at 03. Pausing execution."))
    .stderr(contains("PC 3\n"))
    .stdout(contains("42\n42\n"))
    .stdout(contains("42\n42\n42\n").not())
    .stdout(contains("Halted").not());
}

#[test]
fn feeds_input_while_waiting() {
    debug(
        "tests/files/echo.lmc",
        "continue; input 9; continue; outputs",
    )
    .assert()
    .success()
    .stderr(contains("Waiting for input at 00."))
    .stderr(contains("Queued input 9 (1 pending)."))
    .stderr(contains("Program halted."))
    .stdout(contains("9\n"))
    .stdout(contains("Halted"));
}

#[test]
fn inputs_from_arguments_reach_debugger() {
    let mut cmd = debug("tests/files/sum.lmc", "continue");
    cmd.args(["-i", "20", "-i", "22", "-i", "-5"])
        .assert()
        .success()
        .stderr(contains("Program halted."))
        .stdout(contains("42\n"));
}

#[test]
fn edits_memory_and_jumps() {
    debug(
        "tests/files/three.lmc",
        "set NUM -2; get 5; jump 1; step; exit",
    )
    .assert()
    .success()
    .stderr(contains("Updated memory at address 05."))
    .stderr(contains("998\n"))
    .stderr(contains("Set program counter to 01."))
    // Accumulator was never loaded
    .stdout(contains("0\n"));
}

#[test]
fn reset_reloads_program() {
    debug(
        "tests/files/three.lmc",
        "step 3; reset; outputs; registers; exit",
    )
    .assert()
    .success()
    .stderr(contains("Reset program to initial state."))
    .stderr(contains("No output yet."))
    .stderr(contains("PC 0\n"));
}

#[test]
fn reports_bad_commands() {
    debug(
        "tests/files/three.lmc",
        "fly; get NOWHERE; jump 100; step 1 2; exit",
    )
    .assert()
    .success()
    .stderr(contains("Not a command: `fly`"))
    .stderr(contains("Label not found named `NOWHERE`."))
    .stderr(contains("In command `jump`: For argument `location`: Integer out of range"))
    .stderr(contains("In command `step`: Too many arguments (expected 1, found 2)"));
}

#[test]
fn prints_help_message() {
    debug("tests/files/three.lmc", "help; exit")
        .assert()
        .success()
        .stderr(contains(include_str!("../src/debugger/help.txt")));
}

#[test]
fn shows_source_line() {
    debug("tests/files/sum.lmc", "source POS; exit")
        .assert()
        .success()
        .stderr(contains("At address 05"));
}

#[test]
fn reads_commands_from_stdin() {
    let mut cmd = Command::cargo_bin("lmc").unwrap();
    cmd.args(["debug", "tests/files/echo.lmc", "--minimal"])
        .write_stdin("input 4\ncontinue\n")
        .assert()
        .success()
        .stdout(contains("4\n"))
        .stdout(contains("Halted"));
}
