use std::time::Duration;

use crate::config::FetchConfig;

use super::types::AddressHistory;

/// HTTP client for the address-history endpoint of a BlockCypher-compatible
/// ledger indexing service. Carries a hard request timeout and a bounded
/// retry policy with exponential backoff; callers decide how to recover
/// when all attempts fail.
pub struct LedgerClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    tx_limit: u32,
    retry_attempts: u32,
    retry_backoff: Duration,
}

impl LedgerClient {
    pub fn new(config: &FetchConfig, token: Option<String>) -> eyre::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| eyre::eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
            tx_limit: config.tx_limit,
            retry_attempts: config.retry_attempts.max(1),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    /// Fetch the recent transaction history for an address.
    /// Retries transient failures up to the configured attempt count,
    /// doubling the backoff between attempts.
    pub async fn address_history(&self, address: &str) -> eyre::Result<AddressHistory> {
        let url = self.history_url(address);
        let mut backoff = self.retry_backoff;
        let mut last_err = None;

        for attempt in 1..=self.retry_attempts {
            match self.fetch_once(&url).await {
                Ok(history) => {
                    tracing::debug!(
                        address,
                        entries = history.entry_count(),
                        attempt,
                        "Fetched address history"
                    );
                    return Ok(history);
                }
                Err(e) => {
                    tracing::warn!(
                        address,
                        attempt,
                        max_attempts = self.retry_attempts,
                        error = %e,
                        "Address history fetch failed"
                    );
                    last_err = Some(e);
                    if attempt < self.retry_attempts {
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| eyre::eyre!("Fetch failed with no attempts made")))
    }

    async fn fetch_once(&self, url: &str) -> eyre::Result<AddressHistory> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(eyre::eyre!("Ledger API returned HTTP {}", status));
        }
        let history = response.json::<AddressHistory>().await?;
        Ok(history)
    }

    fn history_url(&self, address: &str) -> String {
        let mut url = format!(
            "{}/addrs/{}?limit={}&includeHex=false",
            self.base_url, address, self.tx_limit
        );
        if let Some(token) = &self.token {
            url.push_str("&token=");
            url.push_str(token);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn test_config(base_url: String) -> FetchConfig {
        FetchConfig {
            base_url,
            token: None,
            tx_limit: 50,
            timeout_secs: 5,
            retry_attempts: 3,
            retry_backoff_ms: 10,
        }
    }

    #[tokio::test]
    async fn test_fetch_txrefs() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/addrs/1BoatSLRHtKNngkdXEeobR76b53LETtpyT");
                then.status(200).json_body(serde_json::json!({
                    "address": "1BoatSLRHtKNngkdXEeobR76b53LETtpyT",
                    "n_tx": 1,
                    "txrefs": [
                        {"tx_hash": "aa", "confirmed": "2024-03-01T10:00:00Z", "value": 100}
                    ]
                }));
            })
            .await;

        let client = LedgerClient::new(&test_config(server.base_url()), None).unwrap();
        let history = client
            .address_history("1BoatSLRHtKNngkdXEeobR76b53LETtpyT")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(history.txrefs.len(), 1);
        assert_eq!(history.txrefs[0].value, Some(100));
    }

    #[tokio::test]
    async fn test_token_in_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/addrs/1Abc")
                    .query_param("token", "secret")
                    .query_param("limit", "50");
                then.status(200).json_body(serde_json::json!({}));
            })
            .await;

        let client =
            LedgerClient::new(&test_config(server.base_url()), Some("secret".to_string()))
                .unwrap();
        let history = client.address_history("1Abc").await.unwrap();

        mock.assert_async().await;
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let server = MockServer::start_async().await;
        let failing = server
            .mock_async(|when, then| {
                when.method(GET).path("/addrs/1Abc");
                then.status(500);
            })
            .await;

        let client = LedgerClient::new(&test_config(server.base_url()), None).unwrap();
        let result = client.address_history("1Abc").await;

        assert_eq!(failing.hits_async().await, 3); // all attempts consumed
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_http_error_is_recoverable_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/addrs/nope");
                then.status(404);
            })
            .await;

        let client = LedgerClient::new(&test_config(server.base_url()), None).unwrap();
        let result = client.address_history("nope").await;
        assert!(result.is_err());
    }
}
