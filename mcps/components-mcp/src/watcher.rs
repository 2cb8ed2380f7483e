//! Corpus change watcher
//!
//! Filesystem events under the corpus root are coalesced over a quiet
//! period and then trigger one full reload. Reload failures are logged and
//! leave the current snapshot in place.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::handle::CatalogHandle;
use crate::loader::CorpusLoader;

/// Running watcher; dropping it stops the watch
pub struct CorpusWatcher {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl CorpusWatcher {
    /// Watch the loader's root and reload `handle` after changes settle
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        handle: Arc<CatalogHandle>,
        loader: Arc<CorpusLoader>,
        debounce: Duration,
        shutdown: CancellationToken,
    ) -> notify::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel::<()>();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if is_content_change(&event) => {
                debug!(paths = ?event.paths, "Corpus change detected");
                let _ = tx.send(());
            }
            Ok(_) => {}
            Err(e) => error!("Corpus watcher error: {}", e),
        })?;
        watcher.watch(loader.root(), RecursiveMode::Recursive)?;
        info!("Watching {} for changes", loader.root().display());

        let task = tokio::spawn(run(rx, handle, loader, debounce, shutdown));
        Ok(Self {
            _watcher: watcher,
            task,
        })
    }
}

impl Drop for CorpusWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn is_content_change(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && !event.paths.iter().all(|p| is_hidden_path(p))
}

fn is_hidden_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<()>,
    handle: Arc<CatalogHandle>,
    loader: Arc<CorpusLoader>,
    debounce: Duration,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            event = rx.recv() => {
                if event.is_none() {
                    break;
                }
            }
        }

        // quiet period: keep draining until no event arrives for `debounce`
        loop {
            match tokio::time::timeout(debounce, rx.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) | Err(_) => break,
            }
        }
        if shutdown.is_cancelled() {
            break;
        }

        let handle = Arc::clone(&handle);
        let loader = Arc::clone(&loader);
        match tokio::task::spawn_blocking(move || handle.reload(&loader)).await {
            Ok(Ok(summary)) => info!(
                generation = summary.generation,
                components = summary.component_count,
                "Reloaded corpus after change"
            ),
            Ok(Err(e)) => warn!("Reload after change failed, keeping current catalog: {}", e),
            Err(e) => error!("Reload task failed: {}", e),
        }
    }
    debug!("Corpus watcher stopped");
}
