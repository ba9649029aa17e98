// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Color handling, stderr logging and stdout capture.
//!
//! Diagnostics go through `tracing` and are printed to stderr as `error: ...`, `warning: ...` and
//! so on. The report itself is written to stdout through an [`OutputWriter`].

use clap::{
    Args, ValueEnum,
    builder::{Styles, styling::AnsiColor},
};
use owo_colors::{OwoColorize, Style, style};
use std::{
    fmt,
    io::{BufWriter, Write},
};
use tracing::{
    Event, Level, Subscriber, debug,
    field::{Field, Visit},
    level_filters::LevelFilter,
    warn,
};
use tracing_subscriber::{
    Layer,
    filter::Targets,
    fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// The tracing target for messages printed without an `error:`/`info:` heading.
pub(crate) const NO_HEADING: &str = "shortscan::no_heading";

/// The environment variable holding a `tracing` filter, e.g. `shortscan_runner=debug`.
const LOG_ENV: &str = "SHORTSCAN_LOG";

pub(crate) fn help_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default())
}

#[derive(Copy, Clone, Debug, Args)]
#[must_use]
pub(crate) struct OutputOpts {
    /// Verbose output
    #[arg(long, short, global = true, env = "SHORTSCAN_VERBOSE")]
    pub(crate) verbose: bool,

    /// Produce color output: auto, always, never
    #[arg(
        long,
        value_enum,
        default_value_t,
        hide_possible_values = true,
        global = true,
        value_name = "WHEN",
        env = "SHORTSCAN_COLOR"
    )]
    pub(crate) color: Color,
}

impl OutputOpts {
    /// Installs the stderr logger. Only the first call in a process has an effect.
    pub(crate) fn init(self) -> OutputContext {
        static INIT_LOGGER: std::sync::Once = std::sync::Once::new();

        INIT_LOGGER.call_once(|| {
            let mut styles = LogStyles::default();
            if self.color.should_colorize(supports_color::Stream::Stderr) {
                styles.colorize();
            }

            let env_filter = std::env::var(LOG_ENV).ok().filter(|value| !value.is_empty());
            let (filter, invalid) = match env_filter.as_deref().map(str::parse::<Targets>) {
                Some(Ok(filter)) => (filter, None),
                Some(Err(err)) => (default_filter(self.verbose), Some(err)),
                None => (default_filter(self.verbose), None),
            };

            tracing_subscriber::registry()
                .with(log_layer(styles, filter, std::io::stderr))
                .init();

            if let Some(err) = invalid {
                warn!("ignoring invalid {LOG_ENV} filter: {err}");
            }
            debug!("logging initialized (color: {:?})", self.color);
        });

        self.to_context()
    }

    pub(crate) fn to_context(self) -> OutputContext {
        OutputContext { color: self.color }
    }
}

fn default_filter(verbose: bool) -> Targets {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    Targets::new().with_default(level)
}

fn log_layer<S, W>(styles: LogStyles, filter: Targets, make_writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    tracing_subscriber::fmt::layer()
        .event_format(HeadingFormatter { styles })
        .with_writer(make_writer)
        .with_filter(filter)
}

/// Output settings resolved from the command line.
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct OutputContext {
    pub(crate) color: Color,
}

impl OutputContext {
    /// Returns styles for messages printed to stderr.
    pub fn stderr_styles(&self) -> StderrStyles {
        let mut styles = StderrStyles::default();
        if self.color.should_colorize(supports_color::Stream::Stderr) {
            styles.bold = style().bold();
            styles.warning_text = style().yellow();
        }
        styles
    }
}

/// When to produce color output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
#[must_use]
pub enum Color {
    /// Colorize if the stream is a terminal that supports color.
    #[default]
    Auto,
    /// Always colorize.
    Always,
    /// Never colorize.
    Never,
}

impl Color {
    pub(crate) fn should_colorize(self, stream: supports_color::Stream) -> bool {
        match self {
            Color::Auto => supports_color::on_cached(stream).is_some(),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

/// Styles for messages printed to stderr.
#[derive(Debug, Default)]
pub struct StderrStyles {
    pub(crate) bold: Style,
    pub(crate) warning_text: Style,
}

#[derive(Debug, Default)]
struct LogStyles {
    error: Style,
    warning: Style,
    info: Style,
    verbose: Style,
}

impl LogStyles {
    fn colorize(&mut self) {
        self.error = style().red().bold();
        self.warning = style().yellow().bold();
        self.info = style().bold();
        self.verbose = style().dimmed();
    }

    fn heading(&self, level: Level) -> (&'static str, Style) {
        match level {
            Level::ERROR => ("error", self.error),
            Level::WARN => ("warning", self.warning),
            Level::INFO => ("info", self.info),
            Level::DEBUG => ("debug", self.verbose),
            Level::TRACE => ("trace", self.verbose),
        }
    }
}

/// Prints each event's message on its own line, after a heading for its level.
struct HeadingFormatter {
    styles: LogStyles,
}

impl<S, N> FormatEvent<S, N> for HeadingFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        if metadata.target() != NO_HEADING {
            let (heading, heading_style) = self.styles.heading(*metadata.level());
            write!(writer, "{}: ", heading.style(heading_style))?;
        }

        let mut message = MessageWriter {
            writer: &mut writer,
            result: Ok(()),
        };
        event.record(&mut message);
        message.result?;

        writeln!(writer)
    }
}

/// Writes the `message` field of an event, ignoring structured fields.
struct MessageWriter<'a, 'w> {
    writer: &'a mut format::Writer<'w>,
    result: fmt::Result,
}

impl Visit for MessageWriter<'_, '_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" && self.result.is_ok() {
            self.result = write!(self.writer, "{value:?}");
        }
    }
}

/// Where the report is written: stdout, or a buffer in tests.
#[derive(Default)]
pub enum OutputWriter {
    /// Write to stdout.
    #[default]
    Normal,
    /// Capture output.
    #[cfg(test)]
    Test {
        /// Captured stdout.
        stdout: Vec<u8>,
    },
}

impl OutputWriter {
    #[cfg(test)]
    pub(crate) fn new_test() -> Self {
        Self::Test { stdout: Vec::new() }
    }

    #[cfg(test)]
    pub(crate) fn stdout(&self) -> Option<&str> {
        match self {
            Self::Normal => None,
            Self::Test { stdout } => Some(std::str::from_utf8(stdout).expect("stdout is UTF-8")),
        }
    }

    pub(crate) fn stdout_writer(&mut self) -> Box<dyn Write + '_> {
        match self {
            Self::Normal => Box::new(BufWriter::new(std::io::stdout().lock())),
            #[cfg(test)]
            Self::Test { stdout } => Box::new(stdout),
        }
    }
}
