use log::{debug, info};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

use super::CatalogFetcher;
use crate::config::ApiConfig;
use crate::errors::{CatalogError, Result};

/// HTTP side of catalog refreshes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client })
    }
}

impl CatalogFetcher for ApiClient {
    fn fetch_catalog_text(&self, url: &str) -> impl Future<Output = Result<String>> + Send {
        let request = self
            .client
            .get(url)
            .header("Accept", "application/json");
        let url = url.to_string();

        async move {
            info!("Fetching catalog from: {}", url);
            let response = request.send().await?;

            let status = response.status();
            debug!("Catalog response status: {}", status);
            if !status.is_success() {
                return Err(CatalogError::ApiError(format!("{} returned {}", url, status)));
            }

            let body = response.text().await?;
            info!("Fetched {} bytes of catalog", body.len());
            Ok(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_from_default_config() {
        assert!(ApiClient::new(&ApiConfig::default()).is_ok());
    }
}
