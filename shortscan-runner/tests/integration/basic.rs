// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use camino::Utf8Path;
use color_eyre::eyre::Result;
use indoc::indoc;
use pretty_assertions::assert_eq;
use shortscan_runner::{
    config::GenerateConfig,
    errors::{GenerateLogError, LineErrorKind, ScanError},
    generate::LogGenerator,
    outcome::OutcomeKind,
    parse::LineField,
    report::{ReportDisplayer, ReportFormat, ScanReport},
    scanner::{LogScanner, MalformedLinePolicy},
    tokens::TokenPair,
};

#[test]
fn scan_and_report() -> Result<()> {
    let dir = log_dir(&[("01-run.txt", ALL_PASS_LOG), ("02-run.txt", MIXED_LOG)])?;
    let universe = universe();
    let results = LogScanner::new(&universe).scan_dir(dir.path())?;

    assert_eq!(results.run_count(), 2);
    let table = results.table();
    assert_eq!(table.get("DAI", "USDC").unwrap().passes(), 2);
    assert_eq!(
        table
            .get("DAI", "WETH")
            .unwrap()
            .get(&OutcomeKind::ArithmeticOverflow),
        1,
        "the failing-tests recap after the summary isn't counted"
    );

    let report = ScanReport::new(&results, Utf8Path::new("shortLogs"));
    assert_eq!(
        report.passing,
        vec![
            TokenPair::new("DAI", "USDC"),
            TokenPair::new("WMATIC", "USDC"),
        ]
    );

    let mut buf = Vec::new();
    ReportDisplayer::new().write(&report, ReportFormat::Human, &mut buf)?;
    let expected = indoc! {"
        Stable pairs that PASS all 2 iterations of tests:
        shortToken: DAI\tbaseToken: USDC
        shortToken: WMATIC\tbaseToken: USDC

        Pairs that FAIL any iterations of tests:
        (Error message: #ofIterationsErrorManifested)

        shortToken: DAI\tbaseToken: WETH
        Arithmetic over/underflow: 1
        PASS: 1

        shortToken: WMATIC\tbaseToken: WETH
        EvmError: Revert: 1
        PASS: 1

        Analysis of 2 iterations of tests complete.
        View the shortLogs directory for more details about the tests.
    "};
    assert_eq!(String::from_utf8(buf)?, expected);

    Ok(())
}

#[test]
fn single_pass_line() -> Result<()> {
    let dir = log_dir(&[(
        "run.txt",
        "[PASS] test_short_all_DAI_using_WETH(uint256) (runs: 256, μ: 1, ~: 1)\n",
    )])?;
    let universe = universe();
    let results = LogScanner::new(&universe).scan_dir(dir.path())?;

    assert_eq!(results.run_count(), 1);
    assert_eq!(results.table().get("DAI", "WETH").unwrap().passes(), 1);

    let report = ScanReport::new(&results, dir.path());
    assert!(report.passing.contains(&TokenPair::new("DAI", "WETH")));
    assert!(
        report
            .failing
            .iter()
            .all(|failing| failing.pair != TokenPair::new("DAI", "WETH"))
    );

    Ok(())
}

#[test]
fn malformed_line_after_summary_is_ignored() -> Result<()> {
    let log = indoc! {"
        [PASS] test_short_all_DAI_using_WETH(uint256)
        Test result: ok. 1 passed; 0 failed
        [FAIL] this line is never parsed
    "};
    let dir = log_dir(&[("run.txt", log)])?;
    let universe = universe();
    let results = LogScanner::new(&universe).scan_dir(dir.path())?;
    assert_eq!(results.table().get("DAI", "WETH").unwrap().passes(), 1);
    Ok(())
}

#[test]
fn fail_without_reason_aborts() -> Result<()> {
    let dir = log_dir(&[
        ("a.txt", ALL_PASS_LOG),
        ("b.txt", "[FAIL] test_short_all_DAI_using_WETH(uint256)\n"),
    ])?;
    let universe = universe();
    let err = LogScanner::new(&universe)
        .scan_dir(dir.path())
        .expect_err("scan should abort");

    let line_error = err.line_error().expect("malformed line error");
    assert_eq!(line_error.path(), &dir.path().join("b.txt"));
    assert_eq!(line_error.line_number(), 1);
    assert_eq!(
        line_error.kind(),
        &LineErrorKind::MissingField {
            field: LineField::Reason
        }
    );
    assert_eq!(
        line_error.to_string(),
        format!(
            "{}:1: outcome line is missing the failure reason \
             (between `Reason: ` and ` Counterexample`)",
            dir.path().join("b.txt")
        )
    );

    Ok(())
}

#[test]
fn fail_without_reason_skipped() -> Result<()> {
    let dir = log_dir(&[(
        "run.txt",
        "[FAIL] test_short_all_DAI_using_WETH(uint256)\n",
    )])?;
    let universe = universe();
    let mut scanner = LogScanner::new(&universe);
    scanner.set_on_malformed_line(MalformedLinePolicy::Skip);
    let results = scanner.scan_dir(dir.path())?;

    assert_eq!(results.run_count(), 1);
    assert_eq!(results.skipped_lines().len(), 1);
    assert_eq!(results.table().get("DAI", "WETH").unwrap().total(), 0);

    let report = ScanReport::new(&results, dir.path());
    assert_eq!(report.skipped_lines, 1);
    assert!(report.passing.is_empty(), "no pair passed the single run");

    Ok(())
}

#[test]
fn subdirectories_are_skipped() -> Result<()> {
    let dir = log_dir(&[("run.txt", ALL_PASS_LOG)])?;
    fs_err::create_dir(dir.path().join("archive"))?;
    write_log(&dir.path().join("archive"), "old.txt", MIXED_LOG)?;

    let universe = universe();
    let results = LogScanner::new(&universe).scan_dir(dir.path())?;
    assert_eq!(results.run_count(), 1, "only regular files count as runs");
    assert_eq!(results.table().get("DAI", "WETH").unwrap().passes(), 1);
    Ok(())
}

#[test]
fn empty_dir_passes_everything() -> Result<()> {
    let dir = log_dir(&[])?;
    let universe = universe();
    let results = LogScanner::new(&universe).scan_dir(dir.path())?;
    assert_eq!(results.run_count(), 0);

    let report = ScanReport::new(&results, dir.path());
    assert_eq!(report.passing.len(), 4, "0 passes out of 0 runs");
    assert!(report.failing.is_empty());
    Ok(())
}

#[test]
fn missing_dir() -> Result<()> {
    let dir = log_dir(&[])?;
    let missing = dir.path().join("missing");
    let universe = universe();
    let err = LogScanner::new(&universe)
        .scan_dir(&missing)
        .expect_err("directory doesn't exist");
    assert!(
        matches!(&err, ScanError::ReadDir { dir, .. } if *dir == missing),
        "unexpected error: {err:?}"
    );
    Ok(())
}

#[test]
fn failed_generate_adds_no_run() -> Result<()> {
    let dir = log_dir(&[("01-run.txt", ALL_PASS_LOG)])?;
    let config = GenerateConfig {
        program: "shortscan-test-no-such-program".to_owned(),
        args: vec!["{rpc-url}".to_owned()],
        rpc_url: "http://localhost:8545".to_owned(),
    };

    let err = LogGenerator::new(&config, dir.path())
        .generate()
        .expect_err("program doesn't exist");
    assert!(
        matches!(err, GenerateLogError::Exec { .. }),
        "unexpected error: {err:?}"
    );

    let universe = universe();
    let results = LogScanner::new(&universe).scan_dir(dir.path())?;
    assert_eq!(results.run_count(), 1, "no empty log was left behind");
    let report = ScanReport::new(&results, dir.path());
    assert_eq!(report.passing.len(), 4, "every pair is still stable");

    Ok(())
}
