//! Shared utilities

pub mod path_resolver;

pub use path_resolver::{is_core_module, ModuleResolver, PathResolver, ResolvedReference};
