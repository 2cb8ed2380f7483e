//! Corpus loading
//!
//! Walks `<root>/<framework>/...` once and builds a [`Catalog`]. Only an
//! unreadable root is fatal; every problem below it is recorded as a
//! [`LoadWarning`] and the file is skipped.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::catalog::{Catalog, CatalogBuilder};
use crate::error::{LoadError, LoadWarning};
use crate::scheme::{validate_segment, SchemeRules};
use crate::types::ComponentRecord;

/// File extensions treated as component files unless configured otherwise
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "html", "htm", "css", "js", "jsx", "ts", "tsx", "vue", "svelte", "json", "md", "txt",
];

/// Loader for one corpus root
#[derive(Debug, Clone)]
pub struct CorpusLoader {
    root: PathBuf,
    rules: SchemeRules,
    extensions: BTreeSet<String>,
}

impl CorpusLoader {
    /// Loader with the built-in scheme rules and default extensions
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            rules: SchemeRules::builtin(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn with_rules(mut self, rules: SchemeRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that the root is a readable directory
    pub fn probe(&self) -> Result<(), LoadError> {
        let unavailable = |reason: String| LoadError::CorpusUnavailable {
            root: self.root.clone(),
            reason,
        };

        let metadata = std::fs::metadata(&self.root).map_err(|e| unavailable(e.to_string()))?;
        if !metadata.is_dir() {
            return Err(unavailable("not a directory".to_string()));
        }
        std::fs::read_dir(&self.root).map_err(|e| unavailable(e.to_string()))?;
        Ok(())
    }

    /// Walk the corpus and build a catalog tagged with `generation`
    pub fn load(&self, generation: u64) -> Result<Catalog, LoadError> {
        self.probe()?;

        let started = Instant::now();
        let mut builder = CatalogBuilder::new(self.root.clone(), generation);

        let mut walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e));

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let source = e
                        .path()
                        .map(|p| self.relative(p))
                        .unwrap_or_else(|| ".".to_string());
                    self.skip(&mut builder, LoadWarning::new(source, e.to_string()));
                    continue;
                }
            };

            let file_type = entry.file_type();
            if entry.depth() == 1 {
                if !file_type.is_dir() {
                    debug!("Ignoring root-level entry {:?}", entry.path());
                    continue;
                }
                let name = entry.file_name().to_string_lossy();
                match validate_segment(&name) {
                    Ok(()) => builder
                        .declare_framework(name.to_string(), self.rules.framework_scheme(&name)),
                    Err(reason) => {
                        self.skip(
                            &mut builder,
                            LoadWarning::new(
                                self.relative(entry.path()),
                                format!("framework directory: {}", reason),
                            ),
                        );
                        walker.skip_current_dir();
                    }
                }
                continue;
            }

            if !file_type.is_file() {
                continue;
            }
            if !self.has_component_extension(entry.path()) {
                debug!("Ignoring non-component file {:?}", entry.path());
                continue;
            }

            match self.read_record(entry.path()) {
                Ok(record) => {
                    if let Err(warning) = builder.insert(record) {
                        self.skip(&mut builder, warning);
                    }
                }
                Err(warning) => self.skip(&mut builder, warning),
            }
        }

        let catalog = builder.build();
        info!(
            generation,
            frameworks = catalog.framework_count(),
            components = catalog.len(),
            warnings = catalog.warnings().len(),
            "Loaded component corpus from {} in {:?}",
            self.root.display(),
            started.elapsed()
        );
        Ok(catalog)
    }

    /// Read and classify one component file
    fn read_record(&self, path: &Path) -> Result<ComponentRecord, LoadWarning> {
        let source = self.relative(path);
        let warning = |reason: String| LoadWarning::new(source.clone(), reason);

        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| warning("outside the corpus root".to_string()))?;
        let parts = relative
            .components()
            .map(|c| match c {
                Component::Normal(part) => part
                    .to_str()
                    .ok_or_else(|| warning("file name is not valid UTF-8".to_string())),
                _ => Err(warning("unexpected path component".to_string())),
            })
            .collect::<Result<Vec<&str>, _>>()?;

        let (framework, rest) = parts
            .split_first()
            .ok_or_else(|| warning("missing framework directory".to_string()))?;
        let category_dir = if rest.len() > 1 { Some(rest[0]) } else { None };
        let scheme = self.rules.scheme_for(framework, category_dir);
        let location = scheme.resolve(rest).map_err(warning)?;

        let bytes = std::fs::read(path).map_err(|e| warning(format!("unreadable: {}", e)))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| warning(format!("content is not valid UTF-8: {}", e)))?;
        if content.trim().is_empty() {
            return Err(warning("empty component file".to_string()));
        }

        Ok(ComponentRecord::new(*framework, location, source.clone(), scheme, content))
    }

    fn skip(&self, builder: &mut CatalogBuilder, warning: LoadWarning) {
        warn!(source = %warning.source, "Skipping corpus entry: {}", warning.reason);
        builder.warn(warning);
    }

    fn has_component_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.contains(&e.to_ascii_lowercase()))
    }

    /// Slash-separated path relative to the root, for diagnostics
    fn relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}
