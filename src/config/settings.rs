//! Validation of fully merged settings

use std::path::Path;

use crate::error::{CruiseError, Result};
use crate::models::config::Settings;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return errors if invalid
    pub fn validate(settings: &Settings) -> Result<()> {
        if !settings.base_dir.is_dir() {
            return Err(CruiseError::invalid_path(&settings.base_dir));
        }

        for pattern in &settings.exclude_patterns {
            glob::Pattern::new(pattern)?;
        }

        for (field, pattern) in [("do_not_follow", &settings.do_not_follow), ("include_only", &settings.include_only)] {
            if let Some(pattern) = pattern {
                regex::Regex::new(pattern)
                    .map_err(|e| CruiseError::config_error(format!("Invalid {} regex '{}': {}", field, pattern, e)))?;
            }
        }

        if let Some(depth) = settings.max_depth {
            if depth == 0 {
                return Err(CruiseError::config_error("Max depth must be at least 1"));
            }
        }

        if settings.effective_module_systems().is_empty() {
            return Err(CruiseError::config_error(
                "No module systems left to extract; check module_systems and ts_pre_compilation_deps",
            ));
        }

        if let Some(rules_file) = &settings.rules_file {
            if !rules_file.is_file() {
                return Err(CruiseError::ConfigNotFound {
                    path: rules_file.clone(),
                    #[cfg(not(tarpaulin_include))]
                    backtrace: std::backtrace::Backtrace::capture(),
                });
            }
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    /// Validate that an output path's directory exists and looks writable
    fn validate_output_path(path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        if !parent.exists() {
            return Err(CruiseError::OutputDirectoryNotFound {
                path: parent.to_path_buf(),
                #[cfg(not(tarpaulin_include))]
                backtrace: std::backtrace::Backtrace::capture(),
            });
        }

        let metadata = std::fs::metadata(parent).map_err(CruiseError::io_error)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if metadata.permissions().mode() & 0o200 == 0 {
                return Err(CruiseError::permission_denied(parent));
            }
        }
        #[cfg(not(unix))]
        if metadata.permissions().readonly() {
            return Err(CruiseError::permission_denied(parent));
        }

        Ok(())
    }
}
