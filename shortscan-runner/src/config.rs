// Copyright (c) The shortscan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration support for shortscan.

use crate::{
    errors::{ConfigParseError, ConfigParseErrorKind},
    outcome::UnknownReasonPolicy,
    scanner::MalformedLinePolicy,
    tokens::{TokenKind, TokenSet, TokenUniverse},
};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::Deserialize;

/// Overall configuration for shortscan.
///
/// The default config (see [`DEFAULT_CONFIG`](Self::DEFAULT_CONFIG)) is always loaded first. A
/// repository-specific config file, if present, is layered on top of it.
#[derive(Clone, Debug)]
pub struct ShortscanConfig {
    log_dir: Utf8PathBuf,
    universe: TokenUniverse,
    unknown_reasons: UnknownReasonPolicy,
    on_malformed_line: MalformedLinePolicy,
    generate: GenerateConfig,
}

impl ShortscanConfig {
    /// The default location of the config within a directory: `.config/shortscan.toml`.
    pub const CONFIG_PATH: &'static str = ".config/shortscan.toml";

    /// Contains the default config as a TOML file.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the config from the given file, or if not specified from `.config/shortscan.toml`
    /// within `base_dir`.
    ///
    /// An explicitly specified file must exist. If no file is specified and `base_dir` doesn't
    /// contain `.config/shortscan.toml`, the default config is used.
    pub fn from_sources(
        base_dir: &Utf8Path,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = base_dir.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        let builder = Self::make_default_config().add_source(source);
        Self::build(&builder).map_err(|kind| ConfigParseError::new(config_file, kind))
    }

    /// Returns the default shortscan config.
    pub fn default_config() -> Self {
        Self::build(&Self::make_default_config()).expect("default config is always valid")
    }

    /// Returns the directory containing test logs.
    pub fn log_dir(&self) -> &Utf8Path {
        &self.log_dir
    }

    /// Overrides the directory containing test logs.
    pub fn set_log_dir(&mut self, log_dir: impl Into<Utf8PathBuf>) -> &mut Self {
        self.log_dir = log_dir.into();
        self
    }

    /// Returns the configured token sets.
    pub fn universe(&self) -> &TokenUniverse {
        &self.universe
    }

    /// Returns the policy for unrecognized failure reasons.
    pub fn unknown_reasons(&self) -> UnknownReasonPolicy {
        self.unknown_reasons
    }

    /// Overrides the policy for unrecognized failure reasons.
    pub fn set_unknown_reasons(&mut self, policy: UnknownReasonPolicy) -> &mut Self {
        self.unknown_reasons = policy;
        self
    }

    /// Returns the policy for malformed lines.
    pub fn on_malformed_line(&self) -> MalformedLinePolicy {
        self.on_malformed_line
    }

    /// Overrides the policy for malformed lines.
    pub fn set_on_malformed_line(&mut self, policy: MalformedLinePolicy) -> &mut Self {
        self.on_malformed_line = policy;
        self
    }

    /// Returns the configuration for generating new logs.
    pub fn generate(&self) -> &GenerateConfig {
        &self.generate
    }

    /// Returns the configuration for generating new logs, mutably.
    pub fn generate_mut(&mut self) -> &mut GenerateConfig {
        &mut self.generate
    }

    // ---
    // Helper methods
    // ---

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build(builder: &ConfigBuilder<DefaultState>) -> Result<Self, ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(ConfigParseErrorKind::DeserializeError)?;
        let deserialized: DeserializedConfig = config
            .try_deserialize()
            .map_err(ConfigParseErrorKind::DeserializeError)?;

        let short = TokenSet::new(TokenKind::Short, deserialized.short_tokens)
            .map_err(ConfigParseErrorKind::InvalidTokens)?;
        let collateral = TokenSet::new(TokenKind::Collateral, deserialized.collateral_tokens)
            .map_err(ConfigParseErrorKind::InvalidTokens)?;

        Ok(Self {
            log_dir: deserialized.log_dir,
            universe: TokenUniverse::new(short, collateral),
            unknown_reasons: deserialized.unknown_reasons,
            on_malformed_line: deserialized.on_malformed_line,
            generate: deserialized.generate,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedConfig {
    log_dir: Utf8PathBuf,
    short_tokens: Vec<String>,
    collateral_tokens: Vec<String>,
    unknown_reasons: UnknownReasonPolicy,
    on_malformed_line: MalformedLinePolicy,
    generate: GenerateConfig,
}

/// Configuration for the command that generates new test logs.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct GenerateConfig {
    /// The program to run.
    pub program: String,

    /// Arguments to the program. `{rpc-url}` is replaced with [`rpc_url`](Self::rpc_url).
    pub args: Vec<String>,

    /// The RPC endpoint to fork from.
    pub rpc_url: String,
}

impl GenerateConfig {
    const RPC_URL_PLACEHOLDER: &'static str = "{rpc-url}";

    /// Returns the arguments with placeholders substituted.
    pub fn resolved_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(Self::RPC_URL_PLACEHOLDER, &self.rpc_url))
            .collect()
    }
}
