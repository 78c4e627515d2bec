//! cruiser - dependency analysis and rule validation for JavaScript and
//! TypeScript projects
//!
//! The library walks a directory, extracts every ES module, CommonJS, AMD and
//! TypeScript type-only dependency with oxc, resolves them into a module
//! graph, derives orphans, cycles and reachability, and validates modules and
//! dependencies against a rule set.
//!
//! ```rust,no_run
//! use cruiser::{Cruiser, RuleSet, Settings};
//!
//! let settings = Settings {
//!     base_dir: "./src".into(),
//!     ..Default::default()
//! };
//! let result = Cruiser::new(settings, RuleSet::default()).cruise()?;
//! println!("{} modules", result.summary.total_cruised);
//! # Ok::<(), cruiser::CruiseError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logger;
pub mod models;
pub mod output;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use crate::core::Cruiser;
pub use error::{CruiseError, ErrorSeverity, Result, ResultExt};
pub use models::{
    config::Settings,
    module_graph::{Dependency, Module},
    rules::{RuleSet, RuleSetConfig, Severity},
    verdict::{CruiseResult, Summary, Violation},
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
