//! Source parser wrapper using OXC

use super::extractors::{self, ExtractOptions};
use crate::error::{Result, ResultExt};
use crate::models::dependency::{ModuleSystem, RawDependency};
use oxc_allocator::Allocator;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::{ParseOptions, Parser};
use oxc_span::SourceType;
use parking_lot::Mutex;
use std::fs;
use std::path::Path;

/// File extensions the cruiser will parse
pub const SOURCE_EXTENSIONS: [&str; 8] = ["js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx"];

/// Thread-safe allocator pool for reuse across parses
pub struct AllocatorPool {
    allocators: Mutex<Vec<Allocator>>,
}

impl AllocatorPool {
    /// Create a new allocator pool
    pub fn new(size: usize) -> Self {
        let allocators = (0..size).map(|_| Allocator::default()).collect();
        Self {
            allocators: Mutex::new(allocators),
        }
    }

    /// Take an allocator from the pool
    pub fn take(&self) -> Option<Allocator> {
        self.allocators.lock().pop()
    }

    /// Reset an allocator and return it to the pool
    pub fn return_allocator(&self, mut allocator: Allocator) {
        allocator.reset();
        self.allocators.lock().push(allocator);
    }
}

/// Dependencies found in one source unit
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub dependencies: Vec<RawDependency>,
    pub parse_errors: Vec<String>,
    /// The parser gave up entirely; `dependencies` is empty
    pub panicked: bool,
}

impl Extraction {
    pub fn has_errors(&self) -> bool {
        self.panicked || !self.parse_errors.is_empty()
    }
}

/// Parses sources and runs the configured extractors over them
pub struct SourceParser {
    parse_options: ParseOptions,
    allocator_pool: AllocatorPool,
    module_systems: Vec<ModuleSystem>,
    extract_options: ExtractOptions,
}

impl SourceParser {
    /// Create a parser that runs the extractors for `module_systems`, in order
    pub fn new(module_systems: Vec<ModuleSystem>, extract_options: ExtractOptions) -> Result<Self> {
        for &system in &module_systems {
            extractors::extractor_for(system)?;
        }

        Ok(Self {
            parse_options: ParseOptions::default(),
            allocator_pool: AllocatorPool::new(num_cpus::get()),
            module_systems,
            extract_options,
        })
    }

    pub fn module_systems(&self) -> &[ModuleSystem] {
        &self.module_systems
    }

    /// Parse source text and extract its dependencies.
    /// The AST never outlives this call; only owned records come back.
    pub fn extract_source(&self, source_text: &str, source_type: SourceType) -> Result<Extraction> {
        let allocator = self.allocator_pool.take().unwrap_or_default();

        let extraction = {
            let ret = Parser::new(&allocator, source_text, source_type)
                .with_options(self.parse_options.clone())
                .parse();

            let parse_errors: Vec<String> = ret.errors.iter().map(OxcDiagnostic::to_string).collect();

            if ret.panicked {
                Extraction {
                    dependencies: Vec::new(),
                    parse_errors,
                    panicked: true,
                }
            } else {
                Extraction {
                    dependencies: extractors::extract_all(&self.module_systems, &ret.program, &self.extract_options)?,
                    parse_errors,
                    panicked: false,
                }
            }
        };

        self.allocator_pool.return_allocator(allocator);
        Ok(extraction)
    }

    /// Read a file and extract its dependencies
    pub fn extract_file(&self, path: &Path) -> Result<Extraction> {
        let source_text = fs::read_to_string(path).with_file_context(path)?;

        let extraction = self.extract_source(&source_text, source_type_for(path))?;
        if extraction.has_errors() {
            tracing::warn!(
                path = %path.display(),
                errors = extraction.parse_errors.len(),
                panicked = extraction.panicked,
                "parse errors, dependencies may be incomplete"
            );
        }
        Ok(extraction)
    }
}

/// Whether a path has one of the parseable extensions
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// The oxc source type for a path, falling back to a TypeScript module
pub fn source_type_for(path: &Path) -> SourceType {
    SourceType::from_path(path).unwrap_or_else(|_| SourceType::ts())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parser() -> SourceParser {
        SourceParser::new(
            vec![ModuleSystem::Es6, ModuleSystem::Cjs, ModuleSystem::TsType],
            ExtractOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_extract_source() {
        let extraction = parser()
            .extract_source(
                "import a from './a';\nconst b = require('./b');\nimport type { C } from './c';",
                SourceType::ts(),
            )
            .unwrap();

        let names: Vec<_> = extraction.dependencies.iter().map(|d| d.module_name.as_str()).collect();
        assert_eq!(names, vec!["./a", "./b", "./c"]);
        assert!(!extraction.has_errors());
    }

    #[test]
    fn test_parse_errors_are_recorded() {
        let extraction = parser()
            .extract_source("import a from './a';\nconst = ;", SourceType::mjs())
            .unwrap();
        assert!(extraction.has_errors());
    }

    #[test]
    fn test_allocators_are_reused() {
        let parser = parser();
        for _ in 0..(num_cpus::get() * 2) {
            parser.extract_source("export * from './x';", SourceType::mjs()).unwrap();
        }
        assert!(parser.allocator_pool.take().is_some());
    }

    #[test]
    fn test_extract_file() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("index.mjs");
        fs::write(&file_path, "export { x } from './x.mjs';").unwrap();

        let extraction = parser().extract_file(&file_path).unwrap();
        assert_eq!(extraction.dependencies.len(), 1);
        assert_eq!(extraction.dependencies[0].module_name, "./x.mjs");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(parser().extract_file(&dir.path().join("nope.js")).is_err());
    }

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file(Path::new("src/a.tsx")));
        assert!(is_source_file(Path::new("src/a.cjs")));
        assert!(!is_source_file(Path::new("src/a.json")));
        assert!(!is_source_file(Path::new("README")));
    }
}
