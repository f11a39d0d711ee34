use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn fail_without_arguments() {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.assert().failure();
}

#[test]
fn fail_with_unknown_argument() {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.arg("-G").assert().failure();
}

#[test]
fn success_when_printing_help() {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.arg("--help").assert().success();
    cmd.arg("-h").assert().success();
}

#[test]
fn wavefront_paf() {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    let assert = cmd
        .args(["-s", "16", "tests/query.fasta", "tests/target.fasta"])
        .assert();
    assert
        .success()
        .stdout(predicate::str::contains(
            "q1\t64\t0\t12\t+\tt1\t64\t0\t12\t12\t12\t255\t\
             id:f:1\tma:i:12\tmm:i:0\tni:i:0\tnd:i:0\tns:i:0\ted:i:0\tal:i:16\tse:f:0\tcg:Z:12=",
        ))
        .stdout(predicate::str::contains(
            "q1\t64\t44\t56\t+\tt1\t64\t44\t56\t12\t12\t255",
        ))
        .stdout(predicate::function(|out: &str| out.lines().count() == 6));
}

#[test]
fn short_query_produces_no_output() {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    let assert = cmd
        .args(["-s", "16", "tests/short.fasta", "tests/target.fasta"])
        .assert();
    assert.success().stdout(predicate::str::is_empty());
}

#[test]
fn full_scan_paf() {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    let assert = cmd
        .args([
            "--full-scan",
            "-s",
            "16",
            "-i",
            "0.95",
            "tests/query.fasta",
            "tests/target.fasta",
        ])
        .assert();
    assert
        .success()
        .stdout(predicate::str::contains(
            "q1\t64\t48\t64\t+\tt1\t64\t48\t64\t16\t16\t255",
        ))
        .stdout(predicate::function(|out: &str| out.lines().count() == 7));
}

#[test]
fn banded_matches_complete() {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    let complete = cmd
        .args(["-s", "16", "tests/query.fasta", "tests/target.fasta"])
        .output()
        .unwrap();
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    let banded = cmd
        .args([
            "-s", "16", "-l", "2", "-d", "10", "tests/query.fasta", "tests/target.fasta",
        ])
        .output()
        .unwrap();
    assert_eq!(complete.stdout, banded.stdout);
}
