//! Shared fixtures for the integration tests

use cruiser::{CruiseResult, Cruiser, Module, RuleSet, RuleSetConfig, Settings};
use std::fs;
use std::path::Path;

/// Write `content` to `relative` under `base`, creating parent directories
pub fn write(base: &Path, relative: &str, content: &str) {
    let path = base.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Settings for cruising `base` without any terminal decoration
pub fn settings_for(base: &Path) -> Settings {
    Settings {
        base_dir: base.to_path_buf(),
        show_progress: false,
        use_colors: false,
        ..Default::default()
    }
}

pub fn rules_from_json(json: &str) -> RuleSet {
    let config: RuleSetConfig = serde_json::from_str(json).unwrap();
    config.compile().unwrap()
}

pub fn cruise(settings: Settings, rules: RuleSet) -> CruiseResult {
    Cruiser::new(settings, rules).cruise().unwrap()
}

pub fn module<'a>(result: &'a CruiseResult, id: &str) -> &'a Module {
    result
        .modules
        .iter()
        .find(|m| m.id == id)
        .unwrap_or_else(|| panic!("no module {id}"))
}

/// `rule@from->to` for every summary violation, in report order
pub fn violation_keys(result: &CruiseResult) -> Vec<String> {
    result
        .summary
        .violations
        .iter()
        .map(|v| format!("{}@{}->{}", v.rule.name, v.from, v.to))
        .collect()
}
