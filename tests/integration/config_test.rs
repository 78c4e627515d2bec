//! Configuration and rule files driving a cruise

use super::common::{violation_keys, write};
use cruiser::config::{load_config_with_env_prefix, load_rule_set, CliArgs};
use cruiser::models::config::OutputFormat;
use cruiser::models::dependency::ModuleSystem;
use cruiser::{CruiseError, Cruiser};
use std::env;
use tempfile::tempdir;

#[test]
fn test_config_file_and_rule_set_drive_the_cruise() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    write(base, "src/a.js", "import b from './b';");
    write(base, "src/b.js", "import a from './a';");
    write(base, "legacy/old.js", "require('../src/a');");
    write(
        base,
        "rules.toml",
        r#"
[[forbidden]]
name = "no-circular"
severity = "error"
to = { circular = true }
"#,
    );
    write(
        base,
        "cruiser.toml",
        &format!(
            r#"
base_dir = "{base}"
exclude_patterns = ["legacy"]
module_systems = ["es6", "tsType"]
output_format = "json"
rules_file = "{rules}"
"#,
            base = base.display(),
            rules = base.join("rules.toml").display()
        ),
    );

    let cli_args = CliArgs {
        config: Some(base.join("cruiser.toml")),
        ..Default::default()
    };
    let settings = load_config_with_env_prefix(cli_args, "CRUISER_IT_FILE").unwrap();
    assert_eq!(settings.output_format, OutputFormat::Json);
    assert_eq!(settings.module_systems, vec![ModuleSystem::Es6, ModuleSystem::TsType]);

    let rules = load_rule_set(settings.rules_file.as_ref().unwrap()).unwrap();
    let result = Cruiser::new(settings, rules).cruise().unwrap();

    assert_eq!(
        violation_keys(&result),
        vec!["no-circular@src/a.js->src/b.js", "no-circular@src/b.js->src/a.js"]
    );
    assert!(result.modules.iter().all(|m| !m.id.starts_with("legacy/")));
}

#[test]
fn test_environment_sits_between_file_and_cli() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    write(base, "cruiser.toml", "max_depth = 3\noutput_format = \"csv\"\n");

    env::set_var("CRUISER_IT_ENV_MAX_DEPTH", "7");
    env::set_var("CRUISER_IT_ENV_OUTPUT_FORMAT", "json");

    let cli_args = CliArgs {
        path: Some(base.to_path_buf()),
        config: Some(base.join("cruiser.toml")),
        output_format: Some(OutputFormat::Text),
        ..Default::default()
    };
    let settings = load_config_with_env_prefix(cli_args, "CRUISER_IT_ENV");

    env::remove_var("CRUISER_IT_ENV_MAX_DEPTH");
    env::remove_var("CRUISER_IT_ENV_OUTPUT_FORMAT");

    let settings = settings.unwrap();
    assert_eq!(settings.max_depth, Some(7));
    assert_eq!(settings.output_format, OutputFormat::Text);
    assert_eq!(settings.base_dir, base);
}

#[test]
fn test_malformed_rules_are_rejected() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "rules.json",
        r#"{ "forbidden": [ { "name": "bad", "from": { "path": "(" } } ] }"#,
    );
    write(
        dir.path(),
        "mixed.json",
        r#"{ "forbidden": [ { "name": "mixed", "to": { "reachable": false, "circular": true } } ] }"#,
    );
    write(
        dir.path(),
        "typo.json",
        r#"{ "forbidden": [ { "name": "typo", "to": { "circulr": true } } ] }"#,
    );

    assert!(matches!(
        load_rule_set(dir.path().join("rules.json")),
        Err(CruiseError::MalformedRule { .. })
    ));
    assert!(matches!(
        load_rule_set(dir.path().join("mixed.json")),
        Err(CruiseError::MalformedRule { .. })
    ));
    assert!(matches!(
        load_rule_set(dir.path().join("typo.json")),
        Err(CruiseError::RuleSetParse { .. })
    ));
}

#[test]
fn test_unknown_module_system_in_config() {
    let dir = tempdir().unwrap();
    write(dir.path(), "cruiser.toml", "module_systems = [\"esm\"]\n");

    let cli_args = CliArgs {
        path: Some(dir.path().to_path_buf()),
        config: Some(dir.path().join("cruiser.toml")),
        ..Default::default()
    };
    let err = load_config_with_env_prefix(cli_args, "CRUISER_IT_UNKNOWN").unwrap_err();
    assert!(err.is_critical());
}
