//! Query engine: the public operations over the current snapshot
//!
//! Each call takes one snapshot from the [`CatalogHandle`] and answers from
//! it alone, so results are never torn by a concurrent reload. Returned
//! values are owned and outlive the snapshot.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::catalog::{Catalog, SearchGuard};
use crate::error::QueryError;
use crate::handle::CatalogHandle;
use crate::types::{
    CatalogStatus, ComponentDescriptor, ComponentRecord, FrameworkSummary, SearchHit,
    SearchRequest,
};

/// Default maximum number of search results
pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone)]
pub struct QueryEngine {
    handle: Arc<CatalogHandle>,
    page_size: usize,
}

impl QueryEngine {
    pub fn new(handle: Arc<CatalogHandle>) -> Self {
        Self {
            handle,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn handle(&self) -> &Arc<CatalogHandle> {
        &self.handle
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn snapshot(&self) -> Result<Arc<Catalog>, QueryError> {
        self.handle.snapshot()
    }

    pub fn list_frameworks(&self) -> Result<Vec<FrameworkSummary>, QueryError> {
        Ok(self.snapshot()?.list_frameworks())
    }

    pub fn list_components(
        &self,
        framework: &str,
        category: Option<&str>,
    ) -> Result<Vec<ComponentDescriptor>, QueryError> {
        self.snapshot()?.list_components(framework, category)
    }

    pub fn get_component(
        &self,
        framework: &str,
        category: &str,
        component_type: &str,
        variant: &str,
    ) -> Result<ComponentRecord, QueryError> {
        self.snapshot()?
            .get_component(framework, category, component_type, variant)
            .cloned()
    }

    pub fn get_component_by_path(&self, path: &str) -> Result<ComponentRecord, QueryError> {
        self.snapshot()?.get_component_by_path(path).cloned()
    }

    /// Ranked search, abandoned with `Cancelled` when `cancel` fires or
    /// `deadline` passes
    pub fn search_components(
        &self,
        request: &SearchRequest,
        cancel: CancellationToken,
        deadline: Option<Instant>,
    ) -> Result<Vec<SearchHit>, QueryError> {
        let mut guard = SearchGuard::new(cancel);
        if let Some(deadline) = deadline {
            guard = guard.with_deadline(deadline);
        }
        self.snapshot()?.search(request, self.page_size, &guard)
    }

    /// Load state and diagnostics; available while loading too
    pub fn status(&self) -> CatalogStatus {
        self.handle.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::scheme::{Location, PathScheme};

    fn engine() -> QueryEngine {
        let mut builder = CatalogBuilder::new("/corpus", 1);
        for n in 1..=5 {
            builder
                .insert(ComponentRecord::new(
                    "hyperui",
                    Location {
                        category: "application".into(),
                        component_type: "buttons".into(),
                        variant: n.to_string(),
                    },
                    format!("hyperui/application/buttons/{}.html", n),
                    PathScheme::Numbered,
                    "<button class=\"btn\">Go</button>",
                ))
                .unwrap();
        }
        QueryEngine::new(Arc::new(CatalogHandle::ready(builder.build())))
    }

    #[test]
    fn test_not_ready_engine() {
        let engine = QueryEngine::new(Arc::new(CatalogHandle::new()));
        assert_eq!(engine.list_frameworks(), Err(QueryError::CatalogNotReady));
        assert!(matches!(
            engine.get_component_by_path("a/b/c/d"),
            Err(QueryError::CatalogNotReady)
        ));
        assert!(matches!(
            engine.search_components(&SearchRequest::new("btn"), CancellationToken::new(), None),
            Err(QueryError::CatalogNotReady)
        ));
    }

    #[test]
    fn test_page_size_caps_results() {
        let engine = engine().with_page_size(3);
        let hits = engine
            .search_components(&SearchRequest::new("button"), CancellationToken::new(), None)
            .unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].component.path, "hyperui/application/buttons/1");
    }

    #[test]
    fn test_owned_results() {
        let engine = engine();
        let record = engine
            .get_component("hyperui", "application", "buttons", "2")
            .unwrap();
        assert_eq!(record.content, "<button class=\"btn\">Go</button>");
        assert_eq!(engine.status().component_count, 5);
    }
}
