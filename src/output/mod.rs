//! Output formatting and writing functionality

mod formatters;
mod progress;
mod writers;

pub use self::formatters::format_summary_line;
pub use self::progress::{create_progress_callback, ProgressReporter};
pub use self::writers::{create_writer, FileWriter, OutputWriter, StdoutWriter};

use crate::error::Result;
use crate::models::config::OutputFormat;
use crate::models::verdict::CruiseResult;

/// Renders a cruise result
pub trait Formatter {
    fn format(&self, results: &CruiseResult) -> Result<String>;
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    pub use_colors: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl TextFormatter {
    pub fn new(use_colors: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            use_colors,
            verbose,
            quiet,
        }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, results: &CruiseResult) -> Result<String> {
        if self.quiet {
            // summary line only
            let mut output = formatters::format_summary_line(results, self.use_colors);
            output.push('\n');
            return Ok(output);
        }

        Ok(formatters::format_results_text(results, self.use_colors, self.verbose))
    }
}

/// The full `CruiseResult` as JSON
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, results: &CruiseResult) -> Result<String> {
        formatters::format_results_json(results)
    }
}

/// One CSV row per violation
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, results: &CruiseResult) -> Result<String> {
        formatters::format_results_csv(results)
    }
}

/// Create a formatter based on the output format
pub fn create_formatter(format: OutputFormat, use_colors: bool, verbose: bool, quiet: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_colors, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}
