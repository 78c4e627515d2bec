//! Module reference resolution
//!
//! The graph builder only sees the [`ModuleResolver`] trait. [`PathResolver`]
//! is the filesystem implementation: relative paths with extension probing and
//! directory indexes, `node_modules` packages through `package.json`
//! (`exports`, `module`, `main`), and Node.js core modules.

use crate::error::{CruiseError, Result, ResultExt};
use dashmap::DashMap;
use lru::LruCache;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Component, Path, PathBuf};

/// Outcome of resolving one reference
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedReference {
    /// Canonical module id of the target
    pub resolved: Option<String>,
    pub core_module: bool,
    pub could_not_resolve: bool,
}

impl ResolvedReference {
    pub fn module(id: impl Into<String>) -> Self {
        Self {
            resolved: Some(id.into()),
            core_module: false,
            could_not_resolve: false,
        }
    }

    pub fn core(name: impl Into<String>) -> Self {
        Self {
            resolved: Some(name.into()),
            core_module: true,
            could_not_resolve: false,
        }
    }

    pub fn unresolved() -> Self {
        Self {
            resolved: None,
            core_module: false,
            could_not_resolve: true,
        }
    }
}

/// Maps a reference, as written in module `from`, to a module id.
/// Must be pure for a given input during one cruise.
pub trait ModuleResolver: Send + Sync {
    fn resolve(&self, reference: &str, from: &str) -> ResolvedReference;
}

impl<F> ModuleResolver for F
where
    F: Fn(&str, &str) -> ResolvedReference + Send + Sync,
{
    fn resolve(&self, reference: &str, from: &str) -> ResolvedReference {
        self(reference, from)
    }
}

/// Node.js built-in modules
const CORE_MODULES: &[&str] = &[
    "assert", "async_hooks", "buffer", "child_process", "cluster", "console", "constants", "crypto",
    "dgram", "diagnostics_channel", "dns", "domain", "events", "fs", "http", "http2", "https",
    "inspector", "module", "net", "os", "path", "perf_hooks", "process", "punycode", "querystring",
    "readline", "repl", "stream", "string_decoder", "sys", "timers", "tls", "trace_events", "tty",
    "url", "util", "v8", "vm", "wasi", "worker_threads", "zlib",
];

/// Extensions probed, in order, for extension-less references
const PROBE_EXTENSIONS: [&str; 9] = ["ts", "tsx", "d.ts", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Whether `reference` names a Node.js built-in (`fs`, `fs/promises`, `node:test`)
pub fn is_core_module(reference: &str) -> bool {
    if reference.starts_with("node:") {
        return true;
    }
    let root = reference.split('/').next().unwrap_or(reference);
    CORE_MODULES.contains(&root)
}

/// The fields of package.json that matter for resolution
#[derive(Debug, Clone, Default, Deserialize)]
struct PackageEntry {
    main: Option<String>,
    module: Option<String>,
    exports: Option<Value>,
}

/// Filesystem resolver with caching
pub struct PathResolver {
    base_dir: PathBuf,
    node_modules_cache: DashMap<(PathBuf, String), Option<PathBuf>>,
    file_exists_cache: DashMap<PathBuf, bool>,
    package_json_cache: Mutex<LruCache<PathBuf, Option<PackageEntry>>>,
}

impl PathResolver {
    /// Create a resolver whose module ids are relative to `base_dir`
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: normalize(base_dir),
            node_modules_cache: DashMap::new(),
            file_exists_cache: DashMap::new(),
            package_json_cache: Mutex::new(LruCache::new(NonZeroUsize::new(256).unwrap_or(NonZeroUsize::MIN))),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Module id for an absolute path: relative to the base directory when
    /// inside it, forward slashes throughout
    pub fn module_id(&self, path: &Path) -> String {
        let path = normalize(path);
        let relative = path.strip_prefix(&self.base_dir).unwrap_or(&path);
        relative.to_string_lossy().replace('\\', "/")
    }

    /// Absolute path of a module id
    pub fn module_path(&self, id: &str) -> PathBuf {
        normalize(&self.base_dir.join(id))
    }

    /// Resolve a reference to an absolute file path
    pub fn resolve_path(&self, specifier: &str, from_file: &Path) -> Result<Option<PathBuf>> {
        if specifier.is_empty() {
            return Ok(None);
        }
        if specifier.starts_with('.') || specifier.starts_with('/') {
            let base = from_file.parent().unwrap_or(from_file);
            return Ok(self.resolve_file_or_directory(&normalize(&base.join(specifier))));
        }
        self.resolve_package(specifier, from_file)
    }

    fn resolve_file_or_directory(&self, candidate: &Path) -> Option<PathBuf> {
        if self.is_file(candidate) {
            return Some(candidate.to_path_buf());
        }

        let candidate_str = candidate.to_string_lossy();
        for ext in PROBE_EXTENSIONS {
            let with_ext = PathBuf::from(format!("{}.{}", candidate_str, ext));
            if self.is_file(&with_ext) {
                return Some(with_ext);
            }
        }

        if candidate.is_dir() {
            for ext in PROBE_EXTENSIONS {
                let index_path = candidate.join(format!("index.{}", ext));
                if self.is_file(&index_path) {
                    return Some(index_path);
                }
            }
        }

        None
    }

    /// Resolve package imports by walking up `node_modules` directories
    fn resolve_package(&self, specifier: &str, from_file: &Path) -> Result<Option<PathBuf>> {
        let (package_name, subpath) = split_package_specifier(specifier);
        let start = from_file.parent().unwrap_or(from_file).to_path_buf();
        let cache_key = (start.clone(), package_name.clone());

        let package_dir = match self.node_modules_cache.get(&cache_key) {
            Some(cached) => cached.clone(),
            None => {
                let found = start
                    .ancestors()
                    .map(|dir| dir.join("node_modules").join(&package_name))
                    .find(|candidate| candidate.is_dir());
                self.node_modules_cache.insert(cache_key, found.clone());
                found
            }
        };

        match package_dir {
            Some(dir) => self.resolve_package_subpath(&dir, subpath.as_deref()),
            None => Ok(None),
        }
    }

    fn resolve_package_subpath(&self, package_dir: &Path, subpath: Option<&str>) -> Result<Option<PathBuf>> {
        let entry = self.package_entry(&package_dir.join("package.json"))?.unwrap_or_default();

        if let Some(exports) = &entry.exports {
            if let Some(resolved) = self.resolve_exports_field(exports, subpath, package_dir) {
                return Ok(Some(resolved));
            }
        }

        if let Some(subpath) = subpath {
            return Ok(self.resolve_file_or_directory(&normalize(&package_dir.join(subpath))));
        }

        for field in [entry.module.as_deref(), entry.main.as_deref()].into_iter().flatten() {
            if let Some(resolved) = self.resolve_file_or_directory(&normalize(&package_dir.join(field))) {
                return Ok(Some(resolved));
            }
        }

        Ok(self.resolve_file_or_directory(&package_dir.join("index")))
    }

    fn package_entry(&self, package_json_path: &Path) -> Result<Option<PackageEntry>> {
        if let Some(cached) = self.package_json_cache.lock().get(package_json_path) {
            return Ok(cached.clone());
        }

        let entry = if self.is_file(package_json_path) {
            let content = fs::read_to_string(package_json_path).with_file_context(package_json_path)?;
            let parsed = serde_json::from_str::<PackageEntry>(&content)
                .map_err(|e| CruiseError::json_parse_error(package_json_path, e))?;
            Some(parsed)
        } else {
            None
        };

        self.package_json_cache
            .lock()
            .put(package_json_path.to_path_buf(), entry.clone());
        Ok(entry)
    }

    fn resolve_exports_field(&self, exports: &Value, subpath: Option<&str>, package_dir: &Path) -> Option<PathBuf> {
        match exports {
            Value::String(_) | Value::Array(_) if subpath.is_none() => self.resolve_export_value(exports, package_dir),
            Value::Object(map) => {
                let export_key = subpath.map(|s| format!("./{}", s)).unwrap_or_else(|| ".".to_string());
                if let Some(value) = map.get(&export_key) {
                    return self.resolve_export_value(value, package_dir);
                }
                // sugar: the object itself is the condition map for "."
                if subpath.is_none() && !map.keys().any(|k| k.starts_with('.')) {
                    return self.resolve_export_value(exports, package_dir);
                }
                None
            }
            _ => None,
        }
    }

    fn resolve_export_value(&self, value: &Value, package_dir: &Path) -> Option<PathBuf> {
        match value {
            Value::String(path) => {
                let resolved = normalize(&package_dir.join(path));
                self.is_file(&resolved).then_some(resolved)
            }
            Value::Array(alternatives) => alternatives
                .iter()
                .find_map(|alternative| self.resolve_export_value(alternative, package_dir)),
            Value::Object(conditions) => ["import", "require", "node", "default"]
                .iter()
                .filter_map(|condition| conditions.get(*condition))
                .find_map(|target| self.resolve_export_value(target, package_dir)),
            _ => None,
        }
    }

    /// Check if a file exists with caching
    fn is_file(&self, path: &Path) -> bool {
        if let Some(cached) = self.file_exists_cache.get(path) {
            return *cached;
        }

        let exists = path.is_file();
        self.file_exists_cache.insert(path.to_path_buf(), exists);
        exists
    }
}

impl ModuleResolver for PathResolver {
    fn resolve(&self, reference: &str, from: &str) -> ResolvedReference {
        if is_core_module(reference) {
            return ResolvedReference::core(reference);
        }

        let from_file = self.module_path(from);
        match self.resolve_path(reference, &from_file) {
            Ok(Some(path)) => ResolvedReference::module(self.module_id(&path)),
            Ok(None) => ResolvedReference::unresolved(),
            Err(err) => {
                tracing::debug!(reference, from, error = %err, "resolution failed");
                ResolvedReference::unresolved()
            }
        }
    }
}

/// Split a package specifier into package name and subpath
fn split_package_specifier(specifier: &str) -> (String, Option<String>) {
    let segments = if specifier.starts_with('@') { 2 } else { 1 };
    let mut parts = specifier.splitn(segments + 1, '/');
    let name: Vec<&str> = parts.by_ref().take(segments).collect();
    let subpath = parts.next().filter(|s| !s.is_empty()).map(String::from);
    (name.join("/"), subpath)
}

/// Lexically normalize a path (drop `.`, fold `..`) without touching the disk
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
