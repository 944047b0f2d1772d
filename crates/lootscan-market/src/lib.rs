//! Lootscan market crate - cached, retrying price lookups.
//!
//! Provides the PriceTransport trait for the remote API, the tarkov.dev
//! GraphQL transport, a TTL cache, and PriceClient, which combines them:
//! cache first, then a bounded number of attempts with a fixed delay.

pub mod cache;
pub mod transport;

use std::future::Future;
use std::time::Duration;

use tracing::{error, info};

use lootscan_core::config::ApiConfig;
use lootscan_core::error::Result;
use lootscan_core::types::ItemPrice;

pub use cache::PriceCache;
pub use transport::{parse_items_response, TarkovDevTransport};

/// One request to the remote price API.
pub trait PriceTransport: Send + Sync {
    fn fetch_items(&self, name: &str) -> impl Future<Output = Result<Vec<ItemPrice>>> + Send;
}

/// Item-name to price records, with failures already absorbed.
pub trait PriceLookup: Send + Sync {
    /// `None` means the lookup failed after every attempt.
    fn get_item_data(&self, name: &str) -> impl Future<Output = Option<Vec<ItemPrice>>> + Send;
}

/// Cache + bounded retry around a [`PriceTransport`].
pub struct PriceClient<T> {
    transport: T,
    cache: PriceCache,
    max_retries: u32,
    request_delay: Duration,
}

impl PriceClient<TarkovDevTransport> {
    /// Build a client for the configured GraphQL endpoint.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let transport =
            TarkovDevTransport::new(&config.url, Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(
            transport,
            Duration::from_secs(config.cache_ttl_secs),
            config.max_retries,
            Duration::from_millis(config.request_delay_ms),
        ))
    }
}

impl<T: PriceTransport> PriceClient<T> {
    pub fn new(transport: T, ttl: Duration, max_retries: u32, request_delay: Duration) -> Self {
        Self {
            transport,
            cache: PriceCache::new(ttl),
            max_retries,
            request_delay,
        }
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Look up `item_name`, serving from cache when possible.
    ///
    /// The trimmed name is the cache key. On a miss, up to `max_retries`
    /// requests are made with `request_delay` after each one; the first
    /// success is cached and returned. Failures are logged and never cached.
    pub async fn get_item_data(&self, item_name: &str) -> Option<Vec<ItemPrice>> {
        let item_name = item_name.trim();

        if let Some(items) = self.cache.get(item_name) {
            return Some(items);
        }

        info!(item = item_name, "Fetching data from API");

        for attempt in 1..=self.max_retries {
            match self.transport.fetch_items(item_name).await {
                Ok(items) => {
                    let items = filter_results(item_name, items);
                    self.cache.insert(item_name, items.clone());
                    tokio::time::sleep(self.request_delay).await;
                    return Some(items);
                }
                Err(e) => {
                    error!(
                        item = item_name,
                        attempt,
                        max_retries = self.max_retries,
                        error = %e,
                        "API error"
                    );
                    if attempt < self.max_retries {
                        tokio::time::sleep(self.request_delay).await;
                    }
                }
            }
        }

        None
    }
}

impl<T: PriceTransport> PriceLookup for PriceClient<T> {
    async fn get_item_data(&self, name: &str) -> Option<Vec<ItemPrice>> {
        PriceClient::get_item_data(self, name).await
    }
}

/// Drop results the API returns for a query but that are a different item.
///
/// Searching "diary" also matches "Slim diary".
fn filter_results(query: &str, items: Vec<ItemPrice>) -> Vec<ItemPrice> {
    if query.eq_ignore_ascii_case("diary") {
        items
            .into_iter()
            .filter(|item| !item.name.to_lowercase().contains("slim diary"))
            .collect()
    } else {
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use lootscan_core::error::LootscanError;
    use tokio::time::Instant;

    fn item(name: &str) -> ItemPrice {
        ItemPrice {
            name: name.to_string(),
            short_name: None,
            avg_24h_price: Some(12_345),
            base_price: Some(1_000),
            wiki_link: None,
        }
    }

    /// Transport that replays a fixed script, then keeps failing.
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<Vec<ItemPrice>>>>,
        calls: AtomicUsize,
        queries: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<Vec<ItemPrice>>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PriceTransport for ScriptedTransport {
        async fn fetch_items(&self, name: &str) -> Result<Vec<ItemPrice>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(name.to_string());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LootscanError::Api("connection refused".into())))
        }
    }

    fn client(script: Vec<Result<Vec<ItemPrice>>>) -> PriceClient<ScriptedTransport> {
        PriceClient::new(
            ScriptedTransport::new(script),
            Duration::from_secs(3600),
            3,
            Duration::from_millis(200),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_is_cached() {
        let client = client(vec![Ok(vec![item("Bolts")])]);

        let first = client.get_item_data("Bolts").await.unwrap();
        let second = client.get_item_data("Bolts").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(client.transport().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_key_is_trimmed() {
        let client = client(vec![Ok(vec![item("Bolts")])]);

        client.get_item_data("  Bolts \n").await.unwrap();
        client.get_item_data("Bolts").await.unwrap();

        assert_eq!(client.transport().calls(), 1);
        assert_eq!(client.transport().queries.lock().unwrap()[0], "Bolts");
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_refetched() {
        let client = PriceClient::new(
            ScriptedTransport::new(vec![Ok(vec![item("old")]), Ok(vec![item("new")])]),
            Duration::from_secs(60),
            3,
            Duration::ZERO,
        );

        assert_eq!(client.get_item_data("x").await.unwrap()[0].name, "old");
        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(client.get_item_data("x").await.unwrap()[0].name, "old");
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(client.get_item_data("x").await.unwrap()[0].name, "new");
        assert_eq!(client.transport().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_are_bounded() {
        let client = client(Vec::new());
        let start = Instant::now();

        assert!(client.get_item_data("Bolts").await.is_none());
        assert_eq!(client.transport().calls(), 3);
        // Delay between attempts, none after the last one.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(400));
        assert!(elapsed < Duration::from_millis(600));
        // Failures are not cached.
        assert!(client.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_then_success() {
        let client = client(vec![
            Err(LootscanError::Api("HTTP 502".into())),
            Err(LootscanError::Api("timeout".into())),
            Ok(vec![item("LEDX")]),
        ]);

        let items = client.get_item_data("LEDX").await.unwrap();
        assert_eq!(items[0].name, "LEDX");
        assert_eq!(client.transport().calls(), 3);
        assert_eq!(client.cache().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_lookup_retries_on_next_call() {
        let client = client(Vec::new());
        assert!(client.get_item_data("Bolts").await.is_none());
        assert!(client.get_item_data("Bolts").await.is_none());
        assert_eq!(client.transport().calls(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_makes_no_request() {
        let client = PriceClient::new(
            ScriptedTransport::new(vec![Ok(vec![item("Bolts")])]),
            Duration::from_secs(60),
            0,
            Duration::from_millis(200),
        );
        assert!(client.get_item_data("Bolts").await.is_none());
        assert_eq!(client.transport().calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_after_success() {
        let client = client(vec![Ok(vec![item("Bolts")])]);
        let start = Instant::now();
        client.get_item_data("Bolts").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(200));

        // Cache hits do not wait.
        let start = Instant::now();
        client.get_item_data("Bolts").await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_is_success() {
        let client = client(vec![Ok(Vec::new())]);
        assert_eq!(client.get_item_data("nonsense").await, Some(Vec::new()));
        assert_eq!(client.get_item_data("nonsense").await, Some(Vec::new()));
        assert_eq!(client.transport().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_diary_filter() {
        let client = client(vec![
            Ok(vec![item("Diary"), item("Slim diary")]),
            Ok(vec![item("Slim diary")]),
        ]);

        let diary = client.get_item_data("Diary").await.unwrap();
        assert_eq!(diary.len(), 1);
        assert_eq!(diary[0].name, "Diary");

        // Other queries are left alone.
        let slim = client.get_item_data("Slim diary").await.unwrap();
        assert_eq!(slim[0].name, "Slim diary");
    }

    #[test]
    fn test_from_config() {
        let config = ApiConfig::default();
        let client = PriceClient::from_config(&config).unwrap();
        assert_eq!(client.transport().url(), "https://api.tarkov.dev/graphql");
        assert_eq!(client.cache().ttl(), Duration::from_secs(3600));
    }
}
