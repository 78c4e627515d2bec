//! Rule set loading
//!
//! Rule files ending in `.json` are read with serde_json; anything else is
//! read as TOML. Both deserialize into `RuleSetConfig`, which is then
//! compiled so regex and shape errors surface before any file is parsed.

use std::fs;
use std::path::Path;

use crate::error::{CruiseError, Result};
use crate::models::rules::{RuleSet, RuleSetConfig};

/// Read and compile the rule set at `path`
pub fn load_rule_set<P: AsRef<Path>>(path: P) -> Result<RuleSet> {
    let path = path.as_ref();
    let config = read_rule_set_config(path)?;
    let rules = config.compile()?;

    tracing::debug!(
        path = %path.display(),
        forbidden = rules.forbidden.len(),
        allowed = rules.allowed.len(),
        "rule set loaded"
    );

    Ok(rules)
}

/// Read a rule set without compiling it
pub fn read_rule_set_config(path: &Path) -> Result<RuleSetConfig> {
    let content = fs::read_to_string(path).map_err(|e| CruiseError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })?;

    parse_rule_set(&content, path)
}

/// Parse rule set text; the format follows the file extension of `path`
pub fn parse_rule_set(content: &str, path: &Path) -> Result<RuleSetConfig> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(content).map_err(|e| CruiseError::rule_set_parse(path, e.to_string()))
    } else {
        toml::from_str(content).map_err(|e| CruiseError::rule_set_parse(path, e.to_string()))
    }
}

/// Load the configured rule set, or an empty one when none is configured
pub fn load_optional_rule_set(path: Option<&Path>) -> Result<RuleSet> {
    match path {
        Some(path) => load_rule_set(path),
        None => Ok(RuleSet::default()),
    }
}
