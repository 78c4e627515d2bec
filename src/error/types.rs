//! Error types and definitions for cruiser

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// Alias keeps thiserror from treating the field as a `provide()` backtrace,
// which needs the nightly `error_generic_member_access` feature.
type CapturedBacktrace = std::backtrace::Backtrace;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for cruiser operations
#[derive(Debug, Error)]
pub enum CruiseError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// JSON parsing errors with file context
    #[error("JSON parsing error in {file}: {source}")]
    JsonParse {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// Permission denied errors
    #[error("Permission denied accessing {path}")]
    PermissionDenied {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// Invalid path errors
    #[error("Invalid path: {path}")]
    InvalidPath {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// CSV handling errors
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// Rule set file could not be read or deserialized (unknown fields included)
    #[error("Error parsing rule set {path}: {message}")]
    RuleSetParse {
        path: PathBuf,
        message: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// A rule that deserialized fine but can't be evaluated
    #[error("Malformed rule '{rule}': {message}")]
    MalformedRule {
        rule: String,
        message: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// Module system name with no registered extractor
    #[error("Unknown module system: {name}")]
    UnknownModuleSystem {
        name: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// Invalid output format
    #[error("Invalid output format: {format}")]
    InvalidOutputFormat {
        format: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// Errors raised while analyzing the dependency graph
    #[error("Analysis error: {message}")]
    Analysis {
        message: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// Directory traversal errors
    #[error("Directory traversal error for {path}: {message}")]
    DirectoryTraversal {
        path: PathBuf,
        message: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// CSV serialization error
    #[error("CSV serialization error: {source}")]
    CsvSerialize {
        #[source]
        source: std::string::FromUtf8Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },

    /// Output directory not found
    #[error("Output directory not found: {path}")]
    OutputDirectoryNotFound {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: CapturedBacktrace,
    },
}

impl CruiseError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Warning level errors - operation can continue
            CruiseError::PermissionDenied { .. } => ErrorSeverity::Warning,
            CruiseError::JsonParse { .. } => ErrorSeverity::Warning,

            // Critical errors - process should terminate
            CruiseError::Config { .. } => ErrorSeverity::Critical,
            CruiseError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            CruiseError::ConfigRead { .. } => ErrorSeverity::Critical,
            CruiseError::ConfigParse { .. } => ErrorSeverity::Critical,
            CruiseError::GlobPattern { .. } => ErrorSeverity::Critical,
            CruiseError::RuleSetParse { .. } => ErrorSeverity::Critical,
            CruiseError::MalformedRule { .. } => ErrorSeverity::Critical,
            CruiseError::UnknownModuleSystem { .. } => ErrorSeverity::Critical,
            CruiseError::InvalidOutputFormat { .. } => ErrorSeverity::Critical,
            CruiseError::StdoutWrite { .. } => ErrorSeverity::Critical,
            CruiseError::OutputDirectoryNotFound { .. } => ErrorSeverity::Critical,

            // Regular errors - current operation fails but overall process can continue
            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should terminate the process
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CruiseError::PermissionDenied { path, .. } => {
                format!("Cannot access '{}' due to permission denied. Check file permissions.", path.display())
            }
            CruiseError::JsonParse { file, source, .. } => {
                format!("Invalid JSON in '{}': {}. Please check the file format.", file.display(), source)
            }
            CruiseError::Io { source, .. } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            CruiseError::InvalidPath { path, .. } => {
                format!("Invalid path: '{}'. Please provide a valid directory path.", path.display())
            }
            CruiseError::ConfigNotFound { path, .. } => {
                format!("Configuration file not found at '{}'. Create one with --init or use command line options.", path.display())
            }
            CruiseError::RuleSetParse { path, message, .. } => {
                format!("Could not load rules from '{}': {}", path.display(), message)
            }
            CruiseError::MalformedRule { rule, message, .. } => {
                format!("Rule '{}' is malformed: {}. Fix the rule set and run again.", rule, message)
            }
            CruiseError::UnknownModuleSystem { name, .. } => {
                format!("Unknown module system '{}'. Supported: es6, cjs, amd, tsType, exoticRequire.", name)
            }
            CruiseError::InvalidOutputFormat { format, .. } => {
                format!("Unknown output format '{}'. Use text, json or csv.", format)
            }
            CruiseError::OutputDirectoryNotFound { path, .. } => {
                format!("Output directory '{}' does not exist. Please create the directory or specify a different output path.", path.display())
            }
            // For other errors, use the standard Display implementation
            _ => self.to_string(),
        }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        CruiseError::Io {
            source,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a JSON parse error with file context
    pub fn json_parse_error(file: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        CruiseError::JsonParse {
            file: file.into(),
            source,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        CruiseError::Config {
            message: message.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        CruiseError::PermissionDenied {
            path: path.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<PathBuf>) -> Self {
        CruiseError::InvalidPath {
            path: path.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a rule set parse error
    pub fn rule_set_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        CruiseError::RuleSetParse {
            path: path.into(),
            message: message.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a malformed rule error
    pub fn malformed_rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        CruiseError::MalformedRule {
            rule: rule.into(),
            message: message.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create an unknown module system error
    pub fn unknown_module_system(name: impl Into<String>) -> Self {
        CruiseError::UnknownModuleSystem {
            name: name.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create an invalid output format error
    pub fn invalid_output_format(format: impl Into<String>) -> Self {
        CruiseError::InvalidOutputFormat {
            format: format.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create an analysis error
    pub fn analysis_error(message: impl Into<String>) -> Self {
        CruiseError::Analysis {
            message: message.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        CruiseError::DirectoryTraversal {
            path: path.into(),
            message: message.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

// Implement From for common error types
impl From<std::io::Error> for CruiseError {
    fn from(err: std::io::Error) -> Self {
        CruiseError::io_error(err)
    }
}

impl From<csv::Error> for CruiseError {
    fn from(err: csv::Error) -> Self {
        CruiseError::Csv {
            source: err,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

impl From<glob::PatternError> for CruiseError {
    fn from(err: glob::PatternError) -> Self {
        CruiseError::GlobPattern {
            source: err,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

impl From<serde_json::Error> for CruiseError {
    fn from(err: serde_json::Error) -> Self {
        CruiseError::JsonSerialize {
            source: err,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

/// Result type alias for cruiser operations
pub type Result<T> = std::result::Result<T, CruiseError>;
