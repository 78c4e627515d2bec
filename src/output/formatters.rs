//! Report rendering

use crate::error::{CruiseError, Result};
use crate::models::rules::Severity;
use crate::models::verdict::{CruiseIssue, CruiseResult, IssueSeverity, Violation};
use ansi_term::Colour::{Blue, Green, Red, Yellow};
use ansi_term::Style;

fn severity_label(severity: Severity, use_colors: bool) -> String {
    let label = format!("{:<5}", severity.to_string());
    if !use_colors {
        return label;
    }
    match severity {
        Severity::Error => Red.bold().paint(label).to_string(),
        Severity::Warn => Yellow.paint(label).to_string(),
        Severity::Info => Blue.paint(label).to_string(),
        Severity::Ignore => Style::new().dimmed().paint(label).to_string(),
    }
}

/// One line per violation. Module-level violations (from == to) print the
/// module only.
pub fn format_violation_text(violation: &Violation, use_colors: bool) -> String {
    let rule_name = if use_colors {
        Style::new().bold().paint(&violation.rule.name).to_string()
    } else {
        violation.rule.name.clone()
    };

    let target = if violation.from == violation.to {
        violation.from.clone()
    } else {
        format!("{} \u{2192} {}", violation.from, violation.to)
    };

    format!("  {} {}: {}\n", severity_label(violation.rule.severity, use_colors), rule_name, target)
}

fn counted(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}

/// The closing summary line
pub fn format_summary_line(results: &CruiseResult, use_colors: bool) -> String {
    let summary = &results.summary;
    let cruised = format!(
        "{}, {} cruised",
        counted(summary.total_cruised, "module", "modules"),
        counted(summary.total_dependencies_cruised, "dependency", "dependencies")
    );

    if summary.violations.is_empty() {
        let line = format!("\u{2714} no dependency violations found ({})", cruised);
        return if use_colors { Green.paint(line).to_string() } else { line };
    }

    let line = format!(
        "\u{2716} {} ({}, {}, {}). {}.",
        counted(summary.violations.len(), "dependency violation", "dependency violations"),
        counted(summary.error, "error", "errors"),
        counted(summary.warn, "warning", "warnings"),
        counted(summary.info, "info", "info"),
        cruised
    );
    if !use_colors {
        line
    } else if summary.has_errors() {
        Red.bold().paint(line).to_string()
    } else {
        Yellow.paint(line).to_string()
    }
}

fn format_issue_text(issue: &CruiseIssue, use_colors: bool) -> String {
    let label = match issue.severity {
        IssueSeverity::Warning => "warning",
        IssueSeverity::Error => "error",
        IssueSeverity::Critical => "critical",
    };
    let label = if use_colors {
        Style::new().dimmed().paint(label).to_string()
    } else {
        label.to_string()
    };
    format!("  {} {}: {}\n", label, issue.path.display(), issue.message)
}

/// Human-readable report, violations grouped by severity
pub fn format_results_text(results: &CruiseResult, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();

    let mut violations: Vec<&Violation> = results.summary.violations.iter().collect();
    violations.sort_by_key(|violation| violation.rule.severity);

    if !violations.is_empty() {
        output.push('\n');
        for violation in violations {
            output.push_str(&format_violation_text(violation, use_colors));
        }
    }

    if !results.issues.is_empty() && (verbose || results.issues.iter().any(|i| i.severity != IssueSeverity::Warning)) {
        output.push_str("\nFiles with problems:\n");
        for issue in &results.issues {
            output.push_str(&format_issue_text(issue, use_colors));
        }
    }

    if verbose {
        let options = &results.summary.options_used;
        output.push_str(&format!("\nBase directory: {}\n", options.base_dir.display()));
        let systems: Vec<&str> = options.module_systems.iter().map(|s| s.as_str()).collect();
        output.push_str(&format!("Module systems: {}\n", systems.join(", ")));
        output.push_str(&format!("Cruised in {:.2?}\n", results.duration));
    }

    output.push('\n');
    output.push_str(&format_summary_line(results, use_colors));
    output.push('\n');
    output
}

/// The full result as pretty JSON
pub fn format_results_json(results: &CruiseResult) -> Result<String> {
    serde_json::to_string_pretty(results).map_err(|e| CruiseError::JsonSerialize {
        source: e,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })
}

/// One CSV row per violation
pub fn format_results_csv(results: &CruiseResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record(["severity", "rule", "from", "to"])?;
    for violation in &results.summary.violations {
        writer.write_record([
            violation.rule.severity.to_string().as_str(),
            violation.rule.name.as_str(),
            violation.from.as_str(),
            violation.to.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| CruiseError::from(csv::Error::from(e.into_error())))?;
    String::from_utf8(bytes).map_err(|e| CruiseError::CsvSerialize {
        source: e,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })
}
