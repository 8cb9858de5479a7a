mod api_client;
mod refresher;

use std::future::Future;

use crate::errors::Result;

pub use api_client::ApiClient;
pub use refresher::{
    CatalogRefresher,
    RefreshOutcome,
    RefreshRequest,
};

/// Network capability: fetch the raw catalog body from `url`.
pub trait CatalogFetcher: Send + Sync + 'static {
    fn fetch_catalog_text(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

#[cfg(test)]
pub(crate) use testing::StaticFetcher;

#[cfg(test)]
mod testing {
    use super::*;
    use crate::errors::CatalogError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Answers every fetch with the same body, or with a network error.
    pub struct StaticFetcher {
        body: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    impl StaticFetcher {
        pub fn ok(body: &str) -> Self {
            Self {
                body: Some(body.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn failing() -> Self {
            Self {
                body: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn calls(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.calls)
        }
    }

    impl CatalogFetcher for StaticFetcher {
        fn fetch_catalog_text(&self, _url: &str) -> impl Future<Output = Result<String>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let body = self.body.clone();
            async move {
                tokio::task::yield_now().await;
                body.ok_or_else(|| CatalogError::NetworkError("connection refused".to_string()))
            }
        }
    }
}
