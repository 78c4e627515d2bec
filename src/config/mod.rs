//! Configuration management
//!
//! Settings are layered: defaults, then a config file, then `CRUISER_*`
//! environment variables, then command-line arguments. Each layer yields a
//! `PartialSettings`; `ConfigBuilder` merges them and validates the result.

pub mod cli;
pub mod file;
pub mod parser;
pub mod rules;
pub mod settings;

use crate::error::Result;
use crate::models::config::{PartialSettings, Settings};

pub use cli::{CliArgs, CliConfig};
pub use file::{EnvConfig, FileConfig, DEFAULT_CONFIG_FILE};
pub use parser::{create_default_config, find_default_config, parse_config_content, parse_config_file};
pub use rules::{load_optional_rule_set, load_rule_set};
pub use settings::SettingsValidator;

/// Prefix of the environment variables read by [`load_config`]
pub const ENV_PREFIX: &str = "CRUISER";

/// Trait for configuration sources
pub trait ConfigSource {
    /// Load configuration from this source
    fn load(&self) -> Result<PartialSettings>;

    /// Check if this configuration source is available
    fn is_available(&self) -> bool;

    /// Get the name of this configuration source for logging
    fn name(&self) -> &str;

    /// Get the priority of this source (higher numbers take precedence)
    fn priority(&self) -> u8 {
        10
    }
}

/// Configuration builder for merging multiple sources
#[derive(Default)]
pub struct ConfigBuilder {
    partial: PartialSettings,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge settings from a partial configuration; `partial` wins
    pub fn merge(mut self, partial: PartialSettings) -> Self {
        self.partial.merge_from(partial);
        self
    }

    /// Load and merge settings from a configuration source
    pub fn load_from<S: ConfigSource>(self, source: &S) -> Result<Self> {
        if !source.is_available() {
            return Ok(self);
        }
        tracing::debug!(source = source.name(), "merging configuration");
        Ok(self.merge(source.load()?))
    }

    /// Add configuration from a file
    pub fn add_config_file(self, path: &std::path::Path) -> Result<Self> {
        let file_config = FileConfig::with_path(path);
        if !file_config.is_available() {
            return Err(crate::error::CruiseError::ConfigNotFound {
                path: path.to_path_buf(),
                #[cfg(not(tarpaulin_include))]
                backtrace: std::backtrace::Backtrace::capture(),
            });
        }
        self.load_from(&file_config)
    }

    /// Merge the first default config file found, if any
    pub fn add_default_config_file(self) -> Result<Self> {
        Ok(match parser::find_default_config()? {
            Some(default_config) => self.merge(default_config),
            None => self,
        })
    }

    /// Build the final settings with validation
    pub fn build(self) -> Result<Settings> {
        let settings = self.partial.to_settings();
        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }
}

/// Load configuration from every layer, CLI arguments winning
pub fn load_config(cli_args: CliArgs) -> Result<Settings> {
    load_config_with_env_prefix(cli_args, ENV_PREFIX)
}

/// Like [`load_config`], reading `<env_prefix>_*` environment variables
pub fn load_config_with_env_prefix(cli_args: CliArgs, env_prefix: &str) -> Result<Settings> {
    let builder = match &cli_args.config {
        Some(path) => ConfigBuilder::new().add_config_file(path)?,
        None => ConfigBuilder::new().add_default_config_file()?,
    };

    let mut sources: Vec<Box<dyn ConfigSource>> = vec![
        Box::new(EnvConfig::new(env_prefix)),
        Box::new(CliConfig::new(cli_args)),
    ];
    sources.sort_by_key(|source| source.priority());

    let mut builder = builder;
    for source in &sources {
        if source.is_available() {
            tracing::debug!(source = source.name(), "merging configuration");
            builder = builder.merge(source.load()?);
        }
    }

    builder.build()
}
