//! Staging area for a catalog under construction

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use chrono::Utc;

use super::{Catalog, FrameworkEntry, RecordId};
use crate::error::LoadWarning;
use crate::scheme::PathScheme;
use crate::types::ComponentRecord;

/// Collects records and warnings, then freezes them into a [`Catalog`]
///
/// Nothing built here is visible to queries until [`CatalogBuilder::build`]
/// hands out the finished catalog.
#[derive(Debug)]
pub struct CatalogBuilder {
    root: PathBuf,
    generation: u64,
    records: BTreeMap<String, ComponentRecord>,
    frameworks: BTreeMap<String, PathScheme>,
    warnings: Vec<LoadWarning>,
}

impl CatalogBuilder {
    pub fn new(root: impl Into<PathBuf>, generation: u64) -> Self {
        Self {
            root: root.into(),
            generation,
            records: BTreeMap::new(),
            frameworks: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Register a framework, even if it ends up with no components
    pub fn declare_framework(&mut self, name: impl Into<String>, scheme: PathScheme) {
        self.frameworks.entry(name.into()).or_insert(scheme);
    }

    /// Add a record; the first record for a path wins
    ///
    /// On a duplicate path the rejected record's source is reported in the
    /// returned warning and the catalog keeps the original.
    pub fn insert(&mut self, record: ComponentRecord) -> Result<(), LoadWarning> {
        if let Some(existing) = self.records.get(&record.path) {
            return Err(LoadWarning::new(
                record.source.clone(),
                format!(
                    "duplicate component path {} (already loaded from {})",
                    record.path, existing.source
                ),
            ));
        }
        self.frameworks
            .entry(record.framework.clone())
            .or_insert(record.scheme);
        self.records.insert(record.path.clone(), record);
        Ok(())
    }

    pub fn warn(&mut self, warning: LoadWarning) {
        self.warnings.push(warning);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Freeze into an immutable catalog
    pub fn build(self) -> Catalog {
        let records: Vec<ComponentRecord> = self.records.into_values().collect();

        let mut frameworks: BTreeMap<String, FrameworkEntry> = self
            .frameworks
            .into_iter()
            .map(|(name, scheme)| {
                (
                    name,
                    FrameworkEntry {
                        scheme: Some(scheme),
                        ..Default::default()
                    },
                )
            })
            .collect();

        let mut by_path = HashMap::with_capacity(records.len());
        let mut postings: BTreeMap<String, Vec<RecordId>> = BTreeMap::new();

        for (id, record) in records.iter().enumerate() {
            by_path.insert(record.path.clone(), id);

            let entry = frameworks.entry(record.framework.clone()).or_default();
            entry.count += 1;
            entry
                .categories
                .entry(record.category.clone())
                .or_default()
                .entry(record.component_type.clone())
                .or_default()
                .insert(record.variant.clone(), id);

            // ids are visited in ascending order, so every posting list stays sorted
            for keyword in record.keywords() {
                postings.entry(keyword.clone()).or_default().push(id);
            }
        }

        Catalog {
            generation: self.generation,
            root: self.root,
            loaded_at: Utc::now(),
            records,
            by_path,
            frameworks,
            postings,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::scheme::Location;

    fn record(framework: &str, category: &str, ty: &str, variant: &str) -> ComponentRecord {
        ComponentRecord::new(
            framework,
            Location {
                category: category.into(),
                component_type: ty.into(),
                variant: variant.into(),
            },
            format!("{}/{}/{}/{}.html", framework, category, ty, variant),
            PathScheme::Numbered,
            format!("<div class=\"{}\">{}</div>", ty, variant),
        )
    }

    fn sample() -> Catalog {
        let mut builder = CatalogBuilder::new("/corpus", 1);
        builder.declare_framework("headlessui-vue", PathScheme::NamedVariant);
        builder
            .insert(record("hyperui", "marketing", "banners", "1"))
            .unwrap();
        builder
            .insert(record("hyperui", "application", "badges", "2"))
            .unwrap();
        builder
            .insert(record("hyperui", "application", "badges", "1"))
            .unwrap();
        builder
            .insert(record("hyperui", "application", "alerts", "1-dark"))
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_duplicate_path_rejected() {
        let mut builder = CatalogBuilder::new("/corpus", 1);
        builder
            .insert(record("hyperui", "application", "badges", "1"))
            .unwrap();

        let mut dup = record("hyperui", "application", "badges", "1");
        dup.source = "hyperui/application/badges/1.htm".to_string();
        let warning = builder.insert(dup).unwrap_err();

        assert_eq!(warning.source, "hyperui/application/badges/1.htm");
        assert!(warning.reason.contains("duplicate"));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_records_sorted_by_path() {
        let catalog = sample();
        let paths: Vec<&str> = catalog.records().iter().map(|r| r.path.as_str()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn test_empty_framework_listed() {
        let catalog = sample();
        let frameworks = catalog.list_frameworks();
        let names: Vec<&str> = frameworks.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["headlessui-vue", "hyperui"]);
        assert_eq!(frameworks[0].component_count, 0);
        assert_eq!(frameworks[1].component_count, 4);

        assert!(catalog
            .list_components("headlessui-vue", None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_listing_order() {
        let catalog = sample();
        let listing = catalog.list_components("hyperui", None).unwrap();
        let pairs: Vec<(&str, &str)> = listing
            .iter()
            .map(|d| (d.component_type.as_str(), d.variant.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("alerts", "1-dark"),
                ("badges", "1"),
                ("badges", "2"),
                ("banners", "1"),
            ]
        );

        let marketing = catalog.list_components("hyperui", Some("marketing")).unwrap();
        assert_eq!(marketing.len(), 1);
        assert!(catalog
            .list_components("hyperui", Some("nope"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_lookups() {
        let catalog = sample();
        let record = catalog
            .get_component("hyperui", "application", "badges", "2")
            .unwrap();
        assert_eq!(record.content, "<div class=\"badges\">2</div>");

        assert_eq!(
            catalog
                .get_component("hyperui", "application", "badges", "99")
                .unwrap_err(),
            QueryError::NotFound("hyperui/application/badges/99".to_string())
        );
        assert!(matches!(
            catalog.list_components("bootstrap", None),
            Err(QueryError::UnknownFramework(_))
        ));
        assert!(catalog
            .get_component_by_path("hyperui/marketing/banners/1")
            .is_ok());
    }
}
