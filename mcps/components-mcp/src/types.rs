//! Core catalog types

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::tokens;
use crate::error::LoadWarning;
use crate::scheme::{Location, PathScheme};

/// One retrievable component variant
///
/// Created once by the loader and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentRecord {
    pub framework: String,
    pub category: String,
    pub component_type: String,
    pub variant: String,
    /// `framework/category/component_type/variant`, the primary key
    pub path: String,
    /// File the record was read from, relative to the corpus root
    pub source: String,
    pub scheme: PathScheme,
    /// Raw snippet text, transported as-is
    pub content: String,
    #[serde(skip)]
    keywords: OnceLock<BTreeSet<String>>,
}

impl ComponentRecord {
    pub fn new(
        framework: impl Into<String>,
        location: Location,
        source: impl Into<String>,
        scheme: PathScheme,
        content: impl Into<String>,
    ) -> Self {
        let framework = framework.into();
        let path = format!(
            "{}/{}/{}/{}",
            framework, location.category, location.component_type, location.variant
        );
        Self {
            framework,
            category: location.category,
            component_type: location.component_type,
            variant: location.variant,
            path,
            source: source.into(),
            scheme,
            content: content.into(),
            keywords: OnceLock::new(),
        }
    }

    /// Search tokens of the path segments and the content
    ///
    /// Computed on first use and cached for the lifetime of the record.
    pub fn keywords(&self) -> &BTreeSet<String> {
        self.keywords.get_or_init(|| {
            let mut keywords = tokens::token_set(&self.path);
            keywords.extend(tokens::tokenize(&self.content));
            keywords
        })
    }

    pub fn descriptor(&self) -> ComponentDescriptor {
        ComponentDescriptor::from(self)
    }
}

/// Identifying fields of a record, without content
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub framework: String,
    pub category: String,
    pub component_type: String,
    pub variant: String,
    pub path: String,
}

impl From<&ComponentRecord> for ComponentDescriptor {
    fn from(record: &ComponentRecord) -> Self {
        Self {
            framework: record.framework.clone(),
            category: record.category.clone(),
            component_type: record.component_type.clone(),
            variant: record.variant.clone(),
            path: record.path.clone(),
        }
    }
}

/// Entry of `list_frameworks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkSummary {
    pub name: String,
    pub scheme: PathScheme,
    pub component_count: usize,
    pub categories: Vec<String>,
}

/// One ranked search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub component: ComponentDescriptor,
    /// Number of query tokens found in the path
    pub path_matches: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A search over the catalog
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: String,
    pub framework: Option<String>,
    /// Lowered to the configured page size when larger
    pub limit: Option<usize>,
    pub include_content: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn in_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = Some(framework.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_content(mut self) -> Self {
        self.include_content = true;
        self
    }
}

/// Whether a snapshot has been installed yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogState {
    Loading,
    Ready,
}

/// Health and diagnostics of the current catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStatus {
    pub state: CatalogState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
    pub framework_count: usize,
    pub component_count: usize,
    pub warnings: Vec<LoadWarning>,
}

impl CatalogStatus {
    pub fn loading() -> Self {
        Self {
            state: CatalogState::Loading,
            generation: None,
            root: None,
            loaded_at: None,
            framework_count: 0,
            component_count: 0,
            warnings: Vec::new(),
        }
    }
}

/// Outcome of installing a freshly loaded catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadSummary {
    pub generation: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_generation: Option<u64>,
    pub framework_count: usize,
    pub component_count: usize,
    pub warning_count: usize,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(content: &str) -> ComponentRecord {
        ComponentRecord::new(
            "hyperui",
            Location {
                category: "application".into(),
                component_type: "modals".into(),
                variant: "1-dark".into(),
            },
            "hyperui/application/modals/1-dark.html",
            PathScheme::Numbered,
            content,
        )
    }

    #[test]
    fn test_record_path() {
        let r = record("<div></div>");
        assert_eq!(r.path, "hyperui/application/modals/1-dark");
        assert_eq!(r.descriptor().variant, "1-dark");
    }

    #[test]
    fn test_keywords_cover_path_and_content() {
        let r = record(r#"<div class="dialog-panel">Confirm</div>"#);
        let keywords = r.keywords();
        assert!(keywords.contains("hyperui"));
        assert!(keywords.contains("modals"));
        assert!(keywords.contains("dark"));
        assert!(keywords.contains("dialog"));
        assert!(keywords.contains("confirm"));
        // single characters are dropped
        assert!(!keywords.contains("1"));
    }

    #[test]
    fn test_search_hit_omits_missing_content() {
        let hit = SearchHit {
            component: record("x").descriptor(),
            path_matches: 1,
            content: None,
        };
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["path"], "hyperui/application/modals/1-dark");
        assert!(json.get("content").is_none());
    }
}
