//! Reports rendered from real cruises

use super::common::{cruise, rules_from_json, settings_for, write};
use cruiser::models::config::OutputFormat;
use cruiser::output::{create_formatter, create_writer, format_summary_line};
use std::fs;
use tempfile::tempdir;

fn cruise_with_violations(base: &std::path::Path) -> cruiser::CruiseResult {
    write(base, "index.js", "require('./missing'); require('./orphan-free');");
    write(base, "orphan-free.js", "");
    write(base, "stray.js", "");

    let rules = rules_from_json(
        r#"{
            "forbidden": [
                { "name": "not-to-unresolvable", "severity": "error", "to": { "couldNotResolve": true } },
                { "name": "no-orphans", "severity": "info", "from": { "orphan": true } }
            ]
        }"#,
    );
    cruise(settings_for(base), rules)
}

#[test]
fn test_text_report() {
    let dir = tempdir().unwrap();
    let result = cruise_with_violations(dir.path());

    let text = create_formatter(OutputFormat::Text, false, false, false).format(&result).unwrap();
    assert!(text.contains("error not-to-unresolvable: index.js \u{2192} ./missing"));
    assert!(text.contains("info  no-orphans: stray.js"));
    assert!(text.trim_end().ends_with(&format_summary_line(&result, false)));
    assert!(format_summary_line(&result, false).contains("1 error, 0 warnings, 1 info"));
}

#[test]
fn test_json_report_written_to_file() {
    let dir = tempdir().unwrap();
    let result = cruise_with_violations(dir.path());
    let report = dir.path().join("report.json");

    let json = create_formatter(OutputFormat::Json, false, false, false).format(&result).unwrap();
    create_writer(Some(&report)).write(&json).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(parsed["summary"]["totalCruised"], 3);
    assert_eq!(parsed["summary"]["violations"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["modules"][0]["source"], "index.js");
    assert_eq!(parsed["modules"][0]["dependencies"][0]["couldNotResolve"], true);
    assert_eq!(parsed["modules"][0]["dependencies"][0]["dependencyTypes"][0], "unknown");
}

#[test]
fn test_csv_report() {
    let dir = tempdir().unwrap();
    let result = cruise_with_violations(dir.path());

    let csv = create_formatter(OutputFormat::Csv, false, false, false).format(&result).unwrap();
    assert_eq!(
        csv.lines().collect::<Vec<_>>(),
        vec![
            "severity,rule,from,to",
            "error,not-to-unresolvable,index.js,./missing",
            "info,no-orphans,stray.js,stray.js",
        ]
    );
}
