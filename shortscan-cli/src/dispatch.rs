// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError, Result,
    output::{OutputContext, OutputOpts, OutputWriter},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, ValueEnum};
use owo_colors::OwoColorize;
use shortscan_runner::{
    ShortscanExitCode,
    config::ShortscanConfig,
    generate::LogGenerator,
    outcome::UnknownReasonPolicy,
    report::{ReportDisplayer, ReportFormat, ScanReport},
    scanner::{LogScanner, MalformedLinePolicy},
};
use std::io::IsTerminal;
use tracing::{debug, info, warn};

/// Summarize repeated `forge test` runs of short positions, per token pair.
///
/// Every file in the log directory is treated as the output of one full run of the test suite.
/// Pairs that passed in every run are listed first, followed by pairs that failed at least once
/// along with how often each failure reason showed up.
#[derive(Debug, Parser)]
#[command(
    version,
    styles = crate::output::help_styles(),
    max_term_width = 100,
)]
pub struct ShortscanApp {
    /// Config file [default: .config/shortscan.toml]
    #[arg(long, global = true, value_name = "PATH")]
    config_file: Option<Utf8PathBuf>,

    #[clap(flatten)]
    scan: ScanOpts,

    #[clap(flatten)]
    generate: GenerateOpts,

    #[clap(flatten)]
    output: OutputOpts,
}

impl ShortscanApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    #[cfg(test)]
    pub(crate) fn test_output(&self) -> OutputContext {
        self.output.to_context()
    }

    /// Executes the app.
    ///
    /// Returns the exit code.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        let mut config =
            ShortscanConfig::from_sources(Utf8Path::new("."), self.config_file.as_deref())?;
        self.scan.apply(&mut config);
        self.generate.apply(&mut config);
        debug!(
            "using {} short and {} collateral tokens",
            config.universe().short().len(),
            config.universe().collateral().len(),
        );

        if self.generate.should_generate(&output)? {
            LogGenerator::new(config.generate(), config.log_dir()).generate()?;
        }

        let mut scanner = LogScanner::new(config.universe());
        scanner
            .set_unknown_reasons(config.unknown_reasons())
            .set_on_malformed_line(config.on_malformed_line());
        let results = scanner.scan_dir(config.log_dir())?;

        let styles = output.stderr_styles();
        if results.run_count() == 0 {
            warn!(
                "no test logs found in `{}`: every pair is trivially stable",
                config.log_dir().style(styles.bold)
            );
        }

        let report = ScanReport::new(&results, config.log_dir());
        let format: ReportFormat = self.scan.message_format.into();
        let mut displayer = ReportDisplayer::new();
        if format == ReportFormat::Human
            && output.color.should_colorize(supports_color::Stream::Stdout)
        {
            displayer.colorize();
        }
        displayer.write(&report, format, output_writer.stdout_writer())?;

        Ok(ShortscanExitCode::OK)
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Scan options")]
struct ScanOpts {
    /// Directory containing test logs [default: from config, shortLogs]
    #[arg(long, value_name = "DIR")]
    log_dir: Option<Utf8PathBuf>,

    /// How to count failure reasons that aren't recognized [default: from config, track]
    #[arg(long, value_enum, value_name = "POLICY")]
    unknown_reasons: Option<UnknownReasonsOpt>,

    /// What to do with lines that can't be parsed [default: from config, abort]
    #[arg(long, value_enum, value_name = "POLICY")]
    on_malformed_line: Option<MalformedLineOpt>,

    /// Output format
    #[arg(long, value_enum, default_value_t, value_name = "FMT")]
    message_format: MessageFormatOpt,
}

impl ScanOpts {
    fn apply(&self, config: &mut ShortscanConfig) {
        if let Some(log_dir) = &self.log_dir {
            config.set_log_dir(log_dir.clone());
        }
        if let Some(policy) = self.unknown_reasons {
            config.set_unknown_reasons(policy.into());
        }
        if let Some(policy) = self.on_malformed_line {
            config.set_on_malformed_line(policy.into());
        }
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Log generation options")]
struct GenerateOpts {
    /// Run the test suite once more before scanning, without prompting
    #[arg(long, conflicts_with = "no_generate")]
    generate: bool,

    /// Don't run the test suite before scanning, without prompting
    #[arg(long)]
    no_generate: bool,

    /// RPC endpoint to fork from when generating [default: from config]
    #[arg(long, value_name = "URL", env = "SHORTSCAN_RPC_URL")]
    rpc_url: Option<String>,
}

impl GenerateOpts {
    fn apply(&self, config: &mut ShortscanConfig) {
        if let Some(rpc_url) = &self.rpc_url {
            config.generate_mut().rpc_url = rpc_url.clone();
        }
    }

    fn should_generate(&self, output: &OutputContext) -> Result<bool> {
        if self.generate {
            return Ok(true);
        }
        if self.no_generate {
            return Ok(false);
        }
        if !std::io::stdin().is_terminal() {
            info!("stdin is not a terminal, skipping log generation (pass --generate to force it)");
            return Ok(false);
        }

        let colorful_theme = dialoguer::theme::ColorfulTheme::default();
        let confirm = if output.color.should_colorize(supports_color::Stream::Stderr) {
            dialoguer::Confirm::with_theme(&colorful_theme)
        } else {
            dialoguer::Confirm::with_theme(&dialoguer::theme::SimpleTheme)
        };
        confirm
            .with_prompt("Do you want to generate 1 new test result?")
            .interact()
            .map_err(|err| ExpectedError::DialoguerError { err })
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum UnknownReasonsOpt {
    /// Count every distinct reason separately
    Track,
    /// Fold all unknown reasons into a single `other` entry
    Bucket,
}

impl From<UnknownReasonsOpt> for UnknownReasonPolicy {
    fn from(opt: UnknownReasonsOpt) -> Self {
        match opt {
            UnknownReasonsOpt::Track => UnknownReasonPolicy::Track,
            UnknownReasonsOpt::Bucket => UnknownReasonPolicy::Bucket,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MalformedLineOpt {
    /// Stop at the first malformed line
    Abort,
    /// Warn, skip the line and keep going
    Skip,
}

impl From<MalformedLineOpt> for MalformedLinePolicy {
    fn from(opt: MalformedLineOpt) -> Self {
        match opt {
            MalformedLineOpt::Abort => MalformedLinePolicy::Abort,
            MalformedLineOpt::Skip => MalformedLinePolicy::Skip,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum MessageFormatOpt {
    /// Human-readable sections
    #[default]
    Human,
    /// JSON on a single line
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

impl From<MessageFormatOpt> for ReportFormat {
    fn from(opt: MessageFormatOpt) -> Self {
        match opt {
            MessageFormatOpt::Human => ReportFormat::Human,
            MessageFormatOpt::Json => ReportFormat::Json,
            MessageFormatOpt::JsonPretty => ReportFormat::JsonPretty,
        }
    }
}
