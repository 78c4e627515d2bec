//! Error context utilities
//!
//! Helpers for attaching context to foreign errors and for reacting to a
//! failed file according to the error's severity.

use crate::error::{CruiseError, ErrorSeverity, Result};
use std::path::Path;

/// Extension trait for Result to add context to errors
pub trait ResultExt<T, E> {
    /// Add context to an error with a custom message
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;

    /// Add file context to an error
    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|err| CruiseError::analysis_error(format!("{}: {}", context(), err)))
    }

    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|err| {
            let dyn_err: &(dyn std::error::Error + 'static) = &err;
            if let Some(io_err) = dyn_err.downcast_ref::<std::io::Error>() {
                if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                    return CruiseError::permission_denied(path.as_ref());
                }
            }

            CruiseError::directory_traversal_error(path.as_ref(), err.to_string())
        })
    }
}

/// Handle an error based on its severity
///
/// Warnings and errors are logged and swallowed; critical errors are logged
/// and handed back to the caller.
pub fn handle_error(err: CruiseError) -> Option<CruiseError> {
    let message = err.user_message();

    match err.severity() {
        ErrorSeverity::Warning => {
            tracing::warn!("{}", message);
            None
        }
        ErrorSeverity::Error => {
            tracing::error!("{}", message);
            None
        }
        ErrorSeverity::Critical => {
            tracing::error!("critical: {}", message);
            Some(err)
        }
    }
}
