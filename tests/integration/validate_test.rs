//! Rule validation over real cruises

use super::common::{cruise, module, rules_from_json, settings_for, violation_keys, write};
use cruiser::{Settings, Severity};
use tempfile::tempdir;

fn create_layered_project(base: &std::path::Path) {
    write(base, "src/main.js", "require('./ui/view'); require('./lib/used');");
    write(base, "src/ui/view.js", "require('../db/store');");
    write(base, "src/db/store.js", "require('../ui/view'); require('fs');");
    write(base, "src/lib/used.js", "");
    write(base, "src/lib/unused.js", "");
}

#[test]
fn test_forbidden_rules() {
    let dir = tempdir().unwrap();
    create_layered_project(dir.path());

    let rules = rules_from_json(
        r#"{
            "forbidden": [
                { "name": "no-circular", "severity": "error", "to": { "circular": true } },
                { "name": "no-ui-to-db", "severity": "warn", "from": { "path": "^src/ui" }, "to": { "path": "^src/db" } },
                { "name": "no-core", "severity": "info", "to": { "coreModule": true } },
                { "name": "no-orphans", "severity": "warn", "from": { "orphan": true } }
            ]
        }"#,
    );
    let result = cruise(settings_for(dir.path()), rules);

    assert_eq!(
        violation_keys(&result),
        vec![
            "no-circular@src/db/store.js->src/ui/view.js",
            "no-core@src/db/store.js->fs",
            "no-orphans@src/lib/unused.js->src/lib/unused.js",
            "no-circular@src/ui/view.js->src/db/store.js",
            "no-ui-to-db@src/ui/view.js->src/db/store.js",
        ]
    );
    assert_eq!(result.summary.error, 2);
    assert_eq!(result.summary.warn, 2);
    assert_eq!(result.summary.info, 1);

    let view = module(&result, "src/ui/view.js");
    assert!(view.valid);
    assert!(!view.dependencies[0].valid);
    assert_eq!(view.dependencies[0].rules[0].severity, Severity::Error);
    assert!(!module(&result, "src/lib/unused.js").valid);
}

#[test]
fn test_allowed_rules() {
    let dir = tempdir().unwrap();
    create_layered_project(dir.path());

    let rules = rules_from_json(
        r#"{
            "allowed": [
                { "from": { "path": "^src/(main|ui)" }, "to": { "path": "^src/" } },
                { "from": { "path": "^src/db" }, "to": { "coreModule": true } }
            ],
            "allowedSeverity": "error"
        }"#,
    );
    let result = cruise(settings_for(dir.path()), rules);

    assert_eq!(
        violation_keys(&result),
        vec!["not-in-allowed@src/db/store.js->src/ui/view.js"]
    );
    assert!(result.summary.has_errors());
}

#[test]
fn test_reachability_rules() {
    let dir = tempdir().unwrap();
    create_layered_project(dir.path());

    let rules = rules_from_json(
        r#"{
            "forbidden": [
                {
                    "name": "no-unreachable-lib",
                    "severity": "error",
                    "from": { "path": "^src/main\\.js$" },
                    "to": { "path": "^src/lib/", "reachable": false }
                },
                {
                    "name": "main-reaches-db",
                    "severity": "info",
                    "from": { "path": "^src/main\\.js$" },
                    "to": { "path": "^src/db/", "reachable": true }
                }
            ]
        }"#,
    );
    let result = cruise(settings_for(dir.path()), rules);

    assert_eq!(
        violation_keys(&result),
        vec![
            "no-unreachable-lib@src/lib/unused.js->src/lib/unused.js",
            "main-reaches-db@src/main.js->src/main.js",
        ]
    );
    // the reached target is reported once, through the root
    assert!(module(&result, "src/db/store.js").valid);
    assert_eq!(result.summary.error, 1);
    assert_eq!(result.summary.info, 1);

    let main = module(&result, "src/main.js");
    let reaches = main.reaches_for("main-reaches-db").unwrap();
    assert_eq!(reaches.modules[0].source, "src/db/store.js");
    assert_eq!(reaches.modules[0].via, vec!["src/ui/view.js", "src/db/store.js"]);

    let used = module(&result, "src/lib/used.js");
    assert!(used.reachable_for("no-unreachable-lib").unwrap().value);
}

#[test]
fn test_validation_disabled() {
    let dir = tempdir().unwrap();
    create_layered_project(dir.path());

    let rules = rules_from_json(r#"{ "forbidden": [ { "name": "no-circular", "to": { "circular": true } } ] }"#);
    let settings = Settings {
        validate: false,
        ..settings_for(dir.path())
    };
    let result = cruise(settings, rules);

    assert!(result.summary.violations.is_empty());
    assert!(result.modules.iter().all(|m| m.valid));
    // derived facts are still there
    assert!(module(&result, "src/ui/view.js").dependencies[0].circular);
}
