// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the shortscan CLI.
//!
//! These run the app in-process against temporary log directories, capturing stdout through
//! [`OutputWriter::new_test`].

use crate::{ExpectedError, OutputWriter, dispatch::ShortscanApp};
use camino::Utf8Path;
use camino_tempfile::Utf8TempDir;
use clap::Parser;
use indoc::{formatdoc, indoc};
use pretty_assertions::assert_eq;
use shortscan_runner::ShortscanExitCode;

static CONFIG: &str = indoc! {r#"
    short-tokens = ["DAI", "USDC"]
    collateral-tokens = ["WETH", "agEUR"]
"#};

static RUN_1: &str = indoc! {"
    Running 4 tests for test/test_child/Child.short.t.sol:ChildShortTest
    [PASS] test_short_all_DAI_using_WETH(uint256) (runs: 256, μ: 1, ~: 1)
    [PASS] test_short_all_DAI_using_agEUR(uint256) (runs: 256, μ: 1, ~: 1)
    [PASS] test_short_all_USDC_using_WETH(uint256) (runs: 256, μ: 1, ~: 1)
    [FAIL. Reason: EvmError: Revert Counterexample: calldata=0x, args=[0]] test_short_all_USDC_using_agEUR(uint256) (runs: 0, μ: 0, ~: 0)
    Test result: FAILED. 3 passed; 1 failed; finished in 10.00s
"};

static RUN_2: &str = indoc! {"
    Running 4 tests for test/test_child/Child.short.t.sol:ChildShortTest
    [PASS] test_short_all_DAI_using_WETH(uint256) (runs: 256, μ: 1, ~: 1)
    [FAIL. Reason: SPL Counterexample: calldata=0x, args=[3]] test_short_all_DAI_using_agEUR(uint256) (runs: 2, μ: 0, ~: 0)
    [PASS] test_short_all_USDC_using_WETH(uint256) (runs: 256, μ: 1, ~: 1)
    [FAIL. Reason: custom failure Counterexample: calldata=0x, args=[1]] test_short_all_USDC_using_agEUR(uint256) (runs: 1, μ: 0, ~: 0)
    Test result: FAILED. 2 passed; 2 failed; finished in 10.00s
"};

struct TempLogs {
    dir: Utf8TempDir,
}

impl TempLogs {
    fn new(logs: &[(&str, &str)]) -> Self {
        let dir = camino_tempfile::tempdir().expect("created temp dir");
        fs_err::write(dir.path().join("shortscan.toml"), CONFIG).expect("wrote config");
        fs_err::create_dir(dir.path().join("logs")).expect("created log dir");
        for (name, contents) in logs {
            fs_err::write(dir.path().join("logs").join(name), contents).expect("wrote log");
        }
        Self { dir }
    }

    fn config_file(&self) -> String {
        self.dir.path().join("shortscan.toml").into_string()
    }

    fn log_dir(&self) -> String {
        self.dir.path().join("logs").into_string()
    }

    fn run(&self, extra_args: &[&str]) -> (Result<i32, ExpectedError>, OutputWriter) {
        let config_file = self.config_file();
        let log_dir = self.log_dir();
        let mut args = vec![
            "shortscan",
            "--config-file",
            config_file.as_str(),
            "--log-dir",
            log_dir.as_str(),
            "--no-generate",
            "--color",
            "never",
        ];
        args.extend(extra_args);
        run_app(&args)
    }
}

fn run_app(args: &[&str]) -> (Result<i32, ExpectedError>, OutputWriter) {
    let app = ShortscanApp::parse_from(args);
    let output = app.test_output();
    let mut writer = OutputWriter::new_test();
    let result = app.exec(output, &mut writer);
    (result, writer)
}

#[test]
fn human_report() {
    let logs = TempLogs::new(&[("01.txt", RUN_1), ("02.txt", RUN_2)]);
    let (result, writer) = logs.run(&[]);
    assert_eq!(result.expect("scan succeeded"), ShortscanExitCode::OK);

    let expected = formatdoc! {"
            Stable pairs that PASS all 2 iterations of tests:
            shortToken: DAI\tbaseToken: WETH
            shortToken: USDC\tbaseToken: WETH

            Pairs that FAIL any iterations of tests:
            (Error message: #ofIterationsErrorManifested)

            shortToken: DAI\tbaseToken: agEUR
            SPL: 1
            PASS: 1

            shortToken: USDC\tbaseToken: agEUR
            EvmError: Revert: 1
            custom failure: 1

            Analysis of 2 iterations of tests complete.
            View the {log_dir} directory for more details about the tests.
        ",
        log_dir = logs.log_dir(),
    };
    assert_eq!(writer.stdout().unwrap(), expected);
}

#[test]
fn json_report() {
    let logs = TempLogs::new(&[("01.txt", RUN_1), ("02.txt", RUN_2)]);
    let (result, writer) = logs.run(&["--message-format", "json", "--unknown-reasons", "bucket"]);
    assert_eq!(result.expect("scan succeeded"), ShortscanExitCode::OK);

    let stdout = writer.stdout().unwrap();
    assert_eq!(stdout.lines().count(), 1, "compact JSON is on one line");
    let value: serde_json::Value = serde_json::from_str(stdout).expect("valid JSON");
    assert_eq!(value["run-count"], 2);
    assert_eq!(value["skipped-lines"], 0);
    assert_eq!(
        value["passing"],
        serde_json::json!([
            { "short": "DAI", "collateral": "WETH" },
            { "short": "USDC", "collateral": "WETH" },
        ])
    );
    assert_eq!(
        value["failing"][1],
        serde_json::json!({
            "short": "USDC",
            "collateral": "agEUR",
            "outcomes": [
                { "outcome": "EvmError: Revert", "count": 1 },
                { "outcome": "other", "count": 1 },
            ],
        })
    );
}

#[test]
fn malformed_line() {
    let broken = indoc! {"
        [PASS] test_short_all_DAI_using_WETH(uint256) (runs: 256, μ: 1, ~: 1)
        [FAIL] test_short_all_DAI_using_agEUR(uint256) (runs: 0, μ: 0, ~: 0)
    "};
    let logs = TempLogs::new(&[("01.txt", RUN_1), ("02.txt", broken)]);

    let (result, writer) = logs.run(&[]);
    let err = result.expect_err("malformed line aborts the scan");
    assert_eq!(err.process_exit_code(), ShortscanExitCode::SCAN_FAILED);
    match &err {
        ExpectedError::ScanError { err } => {
            let line_error = err.line_error().expect("malformed line error");
            assert_eq!(line_error.line_number(), 2);
            assert_eq!(
                line_error.path(),
                &Utf8Path::new(&logs.log_dir()).join("02.txt")
            );
        }
        other => panic!("expected ScanError, found {other:?}"),
    }
    assert_eq!(writer.stdout().unwrap(), "", "nothing is written on error");

    let (result, writer) = logs.run(&["--on-malformed-line", "skip"]);
    assert_eq!(result.expect("scan succeeded"), ShortscanExitCode::OK);
    let stdout = writer.stdout().unwrap();
    assert!(
        stdout.contains("warning: 1 malformed line was skipped\n"),
        "stdout mentions the skipped line:\n{stdout}"
    );
}

#[test]
fn empty_log_dir() {
    let logs = TempLogs::new(&[]);
    let (result, writer) = logs.run(&[]);
    assert_eq!(result.expect("scan succeeded"), ShortscanExitCode::OK);

    let stdout = writer.stdout().unwrap();
    assert!(
        stdout.starts_with(indoc! {"
            Stable pairs that PASS all 0 iterations of tests:
            shortToken: DAI\tbaseToken: WETH
            shortToken: DAI\tbaseToken: agEUR
            shortToken: USDC\tbaseToken: WETH
            shortToken: USDC\tbaseToken: agEUR
        "}),
        "with no runs every pair is in the stable section:\n{stdout}"
    );
}

#[test]
fn missing_config_file() {
    let logs = TempLogs::new(&[]);
    let missing = logs.dir.path().join("missing.toml");
    let (result, _) = run_app(&[
        "shortscan",
        "--config-file",
        missing.as_str(),
        "--no-generate",
    ]);
    let err = result.expect_err("missing config file is an error");
    assert_eq!(err.process_exit_code(), ShortscanExitCode::SETUP_ERROR);
}

#[cfg(unix)]
#[test]
fn generate_then_scan() {
    let logs = TempLogs::new(&[("01.txt", RUN_1)]);
    let config = format!(
        "{CONFIG}\n{}",
        indoc! {r#"
            [generate]
            program = "sh"
            args = ["-c", "printf '%s\n' '[PASS] test_short_all_USDC_using_agEUR(uint256) ({rpc-url})'"]
        "#}
    );
    fs_err::write(logs.config_file(), config).expect("wrote config");

    let config_file = logs.config_file();
    let log_dir = logs.log_dir();
    let (result, writer) = run_app(&[
        "shortscan",
        "--config-file",
        config_file.as_str(),
        "--log-dir",
        log_dir.as_str(),
        "--generate",
        "--rpc-url",
        "local",
        "--color",
        "never",
    ]);
    assert_eq!(result.expect("scan succeeded"), ShortscanExitCode::OK);

    let entries = fs_err::read_dir(&log_dir).expect("read log dir").count();
    assert_eq!(entries, 2, "a new log was written");

    let stdout = writer.stdout().unwrap();
    assert!(
        stdout.contains("Stable pairs that PASS all 2 iterations of tests:\n"),
        "{stdout}"
    );
    assert!(
        stdout.contains("shortToken: USDC\tbaseToken: agEUR\nEvmError: Revert: 1\nPASS: 1\n"),
        "the generated log is scanned along with the existing one:\n{stdout}"
    );
}
