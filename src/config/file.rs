//! Configuration file and environment sources

use std::path::{Path, PathBuf};

use super::{parser, ConfigSource};
use crate::error::{CruiseError, Result};
use crate::models::config::PartialSettings;
use crate::models::dependency::ModuleSystem;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".cruiser.toml";

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// File source for the default file name in the current directory
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 20,
        }
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 20,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a default configuration file at this location
    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.is_available() {
            return Err(CruiseError::ConfigNotFound {
                path: self.path.clone(),
                #[cfg(not(tarpaulin_include))]
                backtrace: std::backtrace::Backtrace::capture(),
            });
        }

        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Suffixes of the variables `EnvConfig` reads, after `<PREFIX>_`
const ENV_KEYS: [&str; 11] = [
    "BASE_DIR",
    "EXCLUDE",
    "MAX_DEPTH",
    "DO_NOT_FOLLOW",
    "INCLUDE_ONLY",
    "OUTPUT_FORMAT",
    "RULES_FILE",
    "MODULE_SYSTEMS",
    "EXOTIC_REQUIRE_STRINGS",
    "TS_PRE_COMPILATION_DEPS",
    "VALIDATE",
];

/// Environment variable configuration source
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

impl EnvConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 10,
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key)).ok()
    }

    fn bool_var(&self, key: &str) -> Result<Option<bool>> {
        self.var(key)
            .map(|value| match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => Ok(true),
                "0" | "false" | "no" => Ok(false),
                other => Err(CruiseError::config_error(format!(
                    "{}_{} must be true or false, got '{}'",
                    self.prefix, key, other
                ))),
            })
            .transpose()
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings::default();

        settings.base_dir = self.var("BASE_DIR").map(PathBuf::from);
        settings.exclude_patterns = self.var("EXCLUDE").map(|v| split_list(&v));
        settings.rules_file = self.var("RULES_FILE").map(PathBuf::from);
        settings.do_not_follow = self.var("DO_NOT_FOLLOW");
        settings.include_only = self.var("INCLUDE_ONLY");
        settings.exotic_require_strings = self.var("EXOTIC_REQUIRE_STRINGS").map(|v| split_list(&v));

        if let Some(max_depth) = self.var("MAX_DEPTH") {
            let depth = max_depth.trim().parse().map_err(|_| {
                CruiseError::config_error(format!("{}_MAX_DEPTH must be a number, got '{}'", self.prefix, max_depth))
            })?;
            settings.max_depth = Some(depth);
        }

        if let Some(format) = self.var("OUTPUT_FORMAT") {
            settings.output_format = Some(format.parse()?);
        }

        if let Some(systems) = self.var("MODULE_SYSTEMS") {
            settings.module_systems = Some(
                split_list(&systems)
                    .iter()
                    .map(|name| name.parse::<ModuleSystem>())
                    .collect::<Result<Vec<_>>>()?,
            );
        }

        settings.ts_pre_compilation_deps = self.bool_var("TS_PRE_COMPILATION_DEPS")?;
        settings.validate = self.bool_var("VALIDATE")?;

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
