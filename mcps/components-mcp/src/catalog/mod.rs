//! In-memory catalog of one loaded corpus snapshot
//!
//! A [`Catalog`] is built once by [`CatalogBuilder`] and is read-only
//! afterwards. It holds two access structures over the same records:
//!
//! - a hierarchical map `framework → category → component_type → variant`
//!   for structured lookups and listings;
//! - an inverted index `token → record ids` for keyword search (see
//!   [`search`]).
//!
//! All query methods are pure reads and safe to call from any number of
//! threads sharing an `Arc<Catalog>`.

mod builder;
pub mod search;
pub mod tokens;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{LoadWarning, QueryError};
use crate::scheme::{parse_component_path, PathScheme};
use crate::types::{
    CatalogState, CatalogStatus, ComponentDescriptor, ComponentRecord, FrameworkSummary,
};

pub use builder::CatalogBuilder;
pub use search::SearchGuard;

/// Index of a record in [`Catalog::records`]
pub type RecordId = usize;

type VariantMap = BTreeMap<String, RecordId>;
type TypeMap = BTreeMap<String, VariantMap>;
type CategoryMap = BTreeMap<String, TypeMap>;

#[derive(Debug, Default)]
struct FrameworkEntry {
    scheme: Option<PathScheme>,
    categories: CategoryMap,
    count: usize,
}

/// A fully built, immutable catalog snapshot
#[derive(Debug)]
pub struct Catalog {
    generation: u64,
    root: PathBuf,
    loaded_at: DateTime<Utc>,
    /// Sorted by path
    records: Vec<ComponentRecord>,
    by_path: HashMap<String, RecordId>,
    frameworks: BTreeMap<String, FrameworkEntry>,
    /// Ordered so query tokens can be matched as prefixes
    postings: BTreeMap<String, Vec<RecordId>>,
    warnings: Vec<LoadWarning>,
}

impl Catalog {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in path order
    pub fn records(&self) -> &[ComponentRecord] {
        &self.records
    }

    /// Files skipped while loading this snapshot
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    pub fn framework_count(&self) -> usize {
        self.frameworks.len()
    }

    pub fn has_framework(&self, framework: &str) -> bool {
        self.frameworks.contains_key(framework)
    }

    /// Frameworks in alphabetical order with their component counts
    pub fn list_frameworks(&self) -> Vec<FrameworkSummary> {
        self.frameworks
            .iter()
            .map(|(name, entry)| FrameworkSummary {
                name: name.clone(),
                scheme: entry.scheme.unwrap_or(PathScheme::NamedVariant),
                component_count: entry.count,
                categories: entry.categories.keys().cloned().collect(),
            })
            .collect()
    }

    /// Components of a framework, optionally restricted to one category
    ///
    /// Ordered by component type, then variant, then category. A category
    /// that does not exist yields an empty listing.
    pub fn list_components(
        &self,
        framework: &str,
        category: Option<&str>,
    ) -> Result<Vec<ComponentDescriptor>, QueryError> {
        let entry = self
            .frameworks
            .get(framework)
            .ok_or_else(|| QueryError::UnknownFramework(framework.to_string()))?;

        let mut listing: Vec<&ComponentRecord> = entry
            .categories
            .iter()
            .filter(|(name, _)| category.map_or(true, |c| c == name.as_str()))
            .flat_map(|(_, types)| types.values())
            .flat_map(|variants| variants.values())
            .map(|&id| &self.records[id])
            .collect();

        listing.sort_by(|a, b| {
            (&a.component_type, &a.variant, &a.category)
                .cmp(&(&b.component_type, &b.variant, &b.category))
        });

        Ok(listing.into_iter().map(ComponentDescriptor::from).collect())
    }

    /// Exact lookup by the four key segments
    pub fn get_component(
        &self,
        framework: &str,
        category: &str,
        component_type: &str,
        variant: &str,
    ) -> Result<&ComponentRecord, QueryError> {
        self.frameworks
            .get(framework)
            .and_then(|f| f.categories.get(category))
            .and_then(|c| c.get(component_type))
            .and_then(|t| t.get(variant))
            .map(|&id| &self.records[id])
            .ok_or_else(|| {
                QueryError::NotFound(format!(
                    "{}/{}/{}/{}",
                    framework, category, component_type, variant
                ))
            })
    }

    /// Lookup by canonical `framework/category/component_type/variant` key
    pub fn get_component_by_path(&self, path: &str) -> Result<&ComponentRecord, QueryError> {
        let key = parse_component_path(path)?.join("/");
        self.record(&key).ok_or(QueryError::NotFound(key))
    }

    /// Record stored under an exact canonical key
    pub fn record(&self, path: &str) -> Option<&ComponentRecord> {
        self.by_path.get(path).map(|&id| &self.records[id])
    }

    /// Diagnostics for health queries
    pub fn status(&self) -> CatalogStatus {
        CatalogStatus {
            state: CatalogState::Ready,
            generation: Some(self.generation),
            root: Some(self.root.clone()),
            loaded_at: Some(self.loaded_at),
            framework_count: self.frameworks.len(),
            component_count: self.records.len(),
            warnings: self.warnings.clone(),
        }
    }
}
