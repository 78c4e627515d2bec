//! Source parsing and dependency extraction
//!
//! `source_parser` owns the oxc parse of one file; `extractors` turns the
//! resulting AST into raw dependency records, one extractor per module system.

pub mod extractors;
pub mod source_parser;

pub use extractors::ExtractOptions;
pub use source_parser::{Extraction, SourceParser};
