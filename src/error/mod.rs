//! Error handling for cruiser
//!
//! Error types, the crate `Result` alias, and helpers for attaching context
//! and reacting to errors by severity.

pub mod context;
mod tests;
pub mod types;

pub use context::{handle_error, ResultExt};
pub use types::{CruiseError, ErrorSeverity, Result};
