//! Report destinations

use crate::error::{CruiseError, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Somewhere a formatted report can go
pub trait OutputWriter {
    fn write(&self, content: &str) -> Result<()>;

    /// Where the report went, for the closing message
    fn destination(&self) -> String;
}

/// Writes to stdout
#[derive(Debug)]
pub struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write(&self, content: &str) -> Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(content.as_bytes())
            .and_then(|_| handle.flush())
            .map_err(|e| CruiseError::StdoutWrite {
                source: e,
                #[cfg(not(tarpaulin_include))]
                backtrace: std::backtrace::Backtrace::capture(),
            })
    }

    fn destination(&self) -> String {
        "stdout".to_string()
    }
}

/// Writes (truncating) to a file
#[derive(Debug)]
pub struct FileWriter {
    path: PathBuf,
}

impl FileWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl OutputWriter for FileWriter {
    fn write(&self, content: &str) -> Result<()> {
        fs::write(&self.path, content).map_err(|e| CruiseError::OutputWrite {
            path: self.path.clone(),
            source: e,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        })
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}

/// File writer when an output file is configured, stdout otherwise
pub fn create_writer(output_file: Option<impl AsRef<Path>>) -> Box<dyn OutputWriter> {
    match output_file {
        Some(path) => Box::new(FileWriter::new(path)),
        None => Box::new(StdoutWriter),
    }
}
