//! Core functionality: graph construction, analysis, rule matching and the
//! cruise pipeline that ties them together

pub mod analyzer;
pub mod cruiser;
pub mod graph_builder;
pub mod matcher;
pub mod parallel;
pub mod validator;

pub use analyzer::analyze;
pub use cruiser::Cruiser;
pub use graph_builder::{build_graph, GraphBuilder};
pub use validator::{validate_dependency, validate_graph, validate_module};
