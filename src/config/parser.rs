//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use super::file::DEFAULT_CONFIG_FILE;
use crate::error::{CruiseError, Result};
use crate::models::config::PartialSettings;

/// Commented configuration written by `cruiser --init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("default_config.toml");

/// Parse a TOML configuration file into PartialSettings, layering it over
/// the file named by its `extends` key (relative to the extending file)
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let mut chain = Vec::new();
    parse_extending(path.as_ref(), &mut chain)
}

fn parse_extending(path: &Path, chain: &mut Vec<PathBuf>) -> Result<PartialSettings> {
    let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if chain.contains(&key) {
        return Err(CruiseError::config_error(format!(
            "Config file {} extends itself through {}",
            path.display(),
            chain.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(" -> ")
        )));
    }
    chain.push(key);

    let mut settings = parse_single_file(path)?;
    let Some(extends) = settings.extends.take() else {
        return Ok(settings);
    };

    let base_path = match path.parent() {
        Some(parent) if extends.is_relative() => parent.join(&extends),
        _ => extends,
    };
    tracing::debug!(config = %path.display(), extends = %base_path.display(), "extending configuration");

    let mut base = parse_extending(&base_path, chain)?;
    base.merge_from(settings);
    Ok(base)
}

fn parse_single_file(path: &Path) -> Result<PartialSettings> {
    if !path.exists() {
        return Err(CruiseError::ConfigNotFound {
            path: path.to_path_buf(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| CruiseError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialSettings
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings = toml::from_str(content).map_err(|e| CruiseError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

/// Validate partial settings for obvious errors
pub fn validate_partial_settings<P: AsRef<Path>>(settings: &PartialSettings, path: P) -> Result<()> {
    let path = path.as_ref();
    let empty_path = |field: &str, value: &Option<PathBuf>| -> Result<()> {
        match value {
            Some(value) if value.as_os_str().is_empty() => Err(CruiseError::config_error(format!(
                "Invalid empty {} in config file: {}",
                field,
                path.display()
            ))),
            _ => Ok(()),
        }
    };

    empty_path("extends", &settings.extends)?;
    empty_path("base_dir", &settings.base_dir)?;
    empty_path("output_file", &settings.output_file)?;
    empty_path("rules_file", &settings.rules_file)?;

    if let Some(patterns) = &settings.exclude_patterns {
        for pattern in patterns {
            if pattern.is_empty() {
                return Err(CruiseError::config_error(format!(
                    "Empty exclude pattern in config file: {}",
                    path.display()
                )));
            }

            glob::Pattern::new(pattern).map_err(|e| {
                CruiseError::config_error(format!(
                    "Invalid exclude pattern '{}' in config file: {}: {}",
                    pattern,
                    path.display(),
                    e
                ))
            })?;
        }
    }

    if let Some(depth) = settings.max_depth {
        if depth == 0 {
            return Err(CruiseError::config_error(format!(
                "Invalid max_depth 0 in config file: {}. Must be at least 1.",
                path.display()
            )));
        }
    }

    for (field, pattern) in [("do_not_follow", &settings.do_not_follow), ("include_only", &settings.include_only)] {
        if let Some(pattern) = pattern {
            regex::Regex::new(pattern).map_err(|e| {
                CruiseError::config_error(format!(
                    "Invalid {} regex '{}' in config file: {}: {}",
                    field,
                    pattern,
                    path.display(),
                    e
                ))
            })?;
        }
    }

    if let Some(names) = &settings.exotic_require_strings {
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(CruiseError::config_error(format!(
                "Empty entry in exotic_require_strings in config file: {}",
                path.display()
            )));
        }
    }

    Ok(())
}

/// Locations searched for a configuration file, in order
pub fn default_config_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
    if let Some(home_dir) = dirs::home_dir() {
        locations.push(home_dir.join(DEFAULT_CONFIG_FILE));
    }
    if let Some(config_dir) = dirs::config_dir() {
        locations.push(config_dir.join("cruiser").join("config.toml"));
    }
    locations
}

/// Find and load configuration from the first default location that exists
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    find_config_in(&default_config_locations())
}

/// Load the first existing file among `locations`
pub fn find_config_in(locations: &[PathBuf]) -> Result<Option<PartialSettings>> {
    for location in locations {
        if location.is_file() {
            tracing::debug!(path = %location.display(), "loading configuration");
            return parse_config_file(location).map(Some);
        }
    }
    Ok(None)
}

/// Create a default configuration file at the specified path
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(CruiseError::io_error)?;
        }
    }

    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(CruiseError::io_error)?;

    Ok(())
}
