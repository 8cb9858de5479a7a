use log::{debug, error, info};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};

use super::CatalogFetcher;
use crate::catalog::{parse_catalog, Catalog};
use crate::errors::{CatalogError, Result};
use crate::storage::CatalogPersistence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshRequest {
    Started,
    /// A fetch is already running; the request was dropped.
    AlreadyInFlight,
}

#[derive(Debug)]
pub enum RefreshOutcome {
    Updated { items: usize, charms: usize },
    Failed(CatalogError),
}

/// Runs catalog fetches on the runtime and applies results on the caller's
/// thread when `tick` sees them.
pub struct CatalogRefresher<F> {
    fetcher: Arc<F>,
    url: String,
    runtime: Handle,
    pending: Option<oneshot::Receiver<Result<String>>>,
}

impl<F: CatalogFetcher> CatalogRefresher<F> {
    pub fn new(fetcher: F, url: impl Into<String>, runtime: Handle) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            url: url.into(),
            runtime,
            pending: None,
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.pending.is_some()
    }

    pub fn request_refresh(&mut self) -> RefreshRequest {
        if self.pending.is_some() {
            debug!("Catalog refresh already in flight");
            return RefreshRequest::AlreadyInFlight;
        }

        let (sender, receiver) = oneshot::channel();
        let fetcher = Arc::clone(&self.fetcher);
        let url = self.url.clone();
        self.runtime.spawn(async move {
            let result = fetcher.fetch_catalog_text(&url).await;
            // The refresher may have been dropped; nothing left to notify.
            let _ = sender.send(result);
        });

        info!("Catalog refresh started");
        self.pending = Some(receiver);
        RefreshRequest::Started
    }

    /// Polls the in-flight fetch without blocking. Returns an outcome exactly
    /// once per started request.
    pub fn tick(
        &mut self,
        store: &dyn CatalogPersistence,
        catalog: &mut Catalog,
    ) -> Option<RefreshOutcome> {
        let receiver = self.pending.as_mut()?;
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => Err(CatalogError::NetworkError(
                "fetch task ended without a result".to_string(),
            )),
        };
        self.pending = None;

        // Text that is not a JSON object never replaces the stored catalog.
        let parsed = result.and_then(|text| parse_catalog(&text).map(|data| (text, data)));
        let outcome = match parsed {
            Ok((text, data)) => {
                store.write_catalog_text(&text);
                catalog.load_all_from_map(&data);
                info!("Catalog refresh applied");
                RefreshOutcome::Updated {
                    items: catalog.items().len(),
                    charms: catalog.charms().len(),
                }
            }
            Err(e) => {
                error!("Catalog refresh failed: {}", e);
                RefreshOutcome::Failed(e)
            }
        };
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::StaticFetcher;
    use crate::models::EntityKind;
    use crate::storage::MemoryCatalogStore;

    const CATALOG: &str = r#"{
        "a": {"type": "Sword", "name": "Excalibur", "base_item": "DIAMOND_SWORD", "stats": {"strength": 5}},
        "b": {"type": "Charm", "name": "Hexed Doll", "base_item": "BOOK", "location": "Forum", "tier": "Rare", "power": 1, "class_name": "Warlock", "stats": {}}
    }"#;

    async fn drive<F: CatalogFetcher>(
        refresher: &mut CatalogRefresher<F>,
        store: &MemoryCatalogStore,
        catalog: &mut Catalog,
    ) -> RefreshOutcome {
        for _ in 0..1000 {
            if let Some(outcome) = refresher.tick(store, catalog) {
                return outcome;
            }
            tokio::task::yield_now().await;
        }
        panic!("refresh never completed");
    }

    #[tokio::test]
    async fn test_successful_refresh_persists_and_reloads() {
        let fetcher = StaticFetcher::ok(CATALOG);
        let calls = fetcher.calls();
        let mut refresher = CatalogRefresher::new(fetcher, "http://catalog.test/items", Handle::current());
        let store = MemoryCatalogStore::new();
        let mut catalog = Catalog::default();

        assert_eq!(refresher.request_refresh(), RefreshRequest::Started);
        assert_eq!(refresher.request_refresh(), RefreshRequest::AlreadyInFlight);

        let outcome = drive(&mut refresher, &store, &mut catalog).await;
        assert!(matches!(outcome, RefreshOutcome::Updated { items: 1, charms: 1 }));
        assert_eq!(store.read_catalog_text(), CATALOG);
        assert_eq!(catalog.items()[0].name, "Excalibur");
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);

        // Completion is reported once and the refresher is idle again.
        assert!(refresher.tick(&store, &mut catalog).is_none());
        assert!(!refresher.is_fetching());
    }

    #[tokio::test]
    async fn test_network_failure_keeps_previous_catalog() {
        let store = MemoryCatalogStore::with_text(CATALOG);
        let mut catalog = Catalog::default();
        catalog.load_all(&store);

        let mut refresher = CatalogRefresher::new(StaticFetcher::failing(), "http://catalog.test/items", Handle::current());
        refresher.request_refresh();
        let outcome = drive(&mut refresher, &store, &mut catalog).await;

        assert!(matches!(outcome, RefreshOutcome::Failed(CatalogError::NetworkError(_))));
        assert_eq!(store.read_catalog_text(), CATALOG);
        assert_eq!(catalog.items().len(), 1);
        assert!(!catalog.load_failed(EntityKind::Item));

        // A failed fetch still allows a retry.
        assert_eq!(refresher.request_refresh(), RefreshRequest::Started);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_not_persisted() {
        let store = MemoryCatalogStore::with_text(CATALOG);
        let mut catalog = Catalog::default();
        catalog.load_all(&store);

        let mut refresher = CatalogRefresher::new(StaticFetcher::ok("<html>oops</html>"), "http://catalog.test/items", Handle::current());
        refresher.request_refresh();
        let outcome = drive(&mut refresher, &store, &mut catalog).await;

        assert!(matches!(outcome, RefreshOutcome::Failed(CatalogError::ParseError(_))));
        assert_eq!(store.read_catalog_text(), CATALOG);
        assert_eq!(catalog.charms().len(), 1);
    }

    #[tokio::test]
    async fn test_tick_without_request_does_nothing() {
        let mut refresher = CatalogRefresher::new(StaticFetcher::ok(CATALOG), "http://catalog.test/items", Handle::current());
        let store = MemoryCatalogStore::new();
        let mut catalog = Catalog::default();

        assert!(refresher.tick(&store, &mut catalog).is_none());
        assert_eq!(store.read_catalog_text(), "{}");
    }
}
