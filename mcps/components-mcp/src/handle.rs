//! The process-wide "current catalog" reference
//!
//! Readers clone the current `Arc<Catalog>` and work on that snapshot for the
//! whole request. A reload builds a complete new catalog first and then
//! replaces the pointer in one step, so a query sees either the old or the
//! new catalog, never a mix. The lock only guards the pointer itself.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::catalog::Catalog;
use crate::error::{LoadError, QueryError};
use crate::loader::CorpusLoader;
use crate::types::{CatalogState, CatalogStatus, ReloadSummary};

/// Shared handle to the current catalog snapshot
#[derive(Debug, Default)]
pub struct CatalogHandle {
    current: RwLock<Option<Arc<Catalog>>>,
    last_generation: AtomicU64,
    /// Serializes reloads so there is a single writer at a time
    writer: Mutex<()>,
}

impl CatalogHandle {
    /// A handle in the `Loading` state
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that is immediately `Ready` with `catalog`
    pub fn ready(catalog: Catalog) -> Self {
        let handle = Self::new();
        handle.install(catalog);
        handle
    }

    pub fn state(&self) -> CatalogState {
        if self.current.read().is_some() {
            CatalogState::Ready
        } else {
            CatalogState::Loading
        }
    }

    /// The current snapshot, or `CatalogNotReady` while loading
    pub fn snapshot(&self) -> Result<Arc<Catalog>, QueryError> {
        self.current
            .read()
            .as_ref()
            .cloned()
            .ok_or(QueryError::CatalogNotReady)
    }

    /// Generation number for the next load
    pub fn next_generation(&self) -> u64 {
        self.last_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publish a fully built catalog and return the snapshot it replaced
    pub fn install(&self, catalog: Catalog) -> Option<Arc<Catalog>> {
        self.last_generation
            .fetch_max(catalog.generation(), Ordering::SeqCst);
        let next = Arc::new(catalog);
        std::mem::replace(&mut *self.current.write(), Some(next))
    }

    /// Load the corpus into a new snapshot and swap it in
    ///
    /// Blocks on I/O; async callers should run it on the blocking pool. If
    /// the load fails the current snapshot stays in place.
    pub fn reload(&self, loader: &CorpusLoader) -> Result<ReloadSummary, LoadError> {
        let _writer = self.writer.lock();
        let started = Instant::now();

        let catalog = loader.load(self.next_generation())?;
        let mut summary = ReloadSummary {
            generation: catalog.generation(),
            previous_generation: None,
            framework_count: catalog.framework_count(),
            component_count: catalog.len(),
            warning_count: catalog.warnings().len(),
            elapsed_ms: 0,
        };

        let previous = self.install(catalog);
        summary.previous_generation = previous.map(|p| p.generation());
        summary.elapsed_ms = started.elapsed().as_millis() as u64;

        info!(
            generation = summary.generation,
            previous = ?summary.previous_generation,
            components = summary.component_count,
            "Catalog snapshot installed"
        );
        Ok(summary)
    }

    /// Health view of whatever is currently installed
    pub fn status(&self) -> CatalogStatus {
        match self.snapshot() {
            Ok(catalog) => catalog.status(),
            Err(_) => CatalogStatus::loading(),
        }
    }
}
