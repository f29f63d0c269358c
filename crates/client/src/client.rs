use crate::cache::ResponseCache;
use crate::http::HttpTransport;
use crate::rate_limit::RateLimiter;
use crate::{ContentSource, GraphqlRequest, Transport, queries, wire};
use async_trait::async_trait;
use content_hub_core::{ContentItem, ContentKind, Error, HubConfig, HubIndex, Result};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Revalidation intervals used by the typed helpers
const ITEM_REVALIDATE: Duration = Duration::from_secs(1200);
const LIST_REVALIDATE: Duration = Duration::from_secs(3600);

/// Timeout, retry and fallback behaviour of [`ContentClient::fetch`]
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPolicy {
    /// Bound on a single attempt
    pub timeout: Duration,
    /// Attempts after the first
    pub retries: u32,
    /// Return `{}` instead of failing once retries are exhausted
    pub fallback_on_error: bool,
}

impl FetchPolicy {
    pub fn from_config(config: &HubConfig) -> Self {
        Self {
            timeout: config.timeout,
            retries: config.retries,
            fallback_on_error: config.fallback_on_error,
        }
    }
}

/// Advisory freshness hint for one call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheHint {
    pub revalidate: Option<Duration>,
}

impl CacheHint {
    pub const NONE: CacheHint = CacheHint { revalidate: None };

    pub fn revalidate(interval: Duration) -> Self {
        Self {
            revalidate: Some(interval),
        }
    }
}

pub struct ContentClient {
    transport: Arc<dyn Transport>,
    limiter: Arc<RateLimiter>,
    cache: Option<Arc<ResponseCache>>,
    policy: FetchPolicy,
}

impl ContentClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        limiter: Arc<RateLimiter>,
        policy: FetchPolicy,
    ) -> Self {
        Self {
            transport,
            limiter,
            cache: None,
            policy,
        }
    }

    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// HTTP client with its own limiter and cache, as configured
    pub fn from_config(config: &HubConfig) -> Result<Self> {
        let endpoint = config.endpoint.as_deref().ok_or_else(|| {
            Error::ConfigParse("No content API endpoint configured (CONTENT_API_URL)".to_string())
        })?;
        let transport = HttpTransport::new(endpoint, config.timeout)?;
        let limiter = Arc::new(RateLimiter::new(config.request_delay));
        let cache = Arc::new(ResponseCache::new(config.cache_ttl));

        let policy = FetchPolicy::from_config(config);
        Ok(Self::new(Arc::new(transport), limiter, policy).with_cache(cache))
    }

    /// Run `query` and return its `data` object.
    ///
    /// Fresh cache entries short-circuit the backend. Failed attempts are
    /// retried up to the policy's bound; after that the last known good
    /// value is served, then `{}` if the fallback is enabled, else the error.
    pub async fn fetch(
        &self,
        query: &str,
        variables: Option<Value>,
        hint: CacheHint,
    ) -> Result<Value> {
        let key = ResponseCache::key(query, variables.as_ref());

        if let Some(cache) = &self.cache
            && let Some(hit) = cache.get_fresh(&key, hint.revalidate)
        {
            return Ok(hit);
        }

        let request = GraphqlRequest {
            query: query.to_string(),
            variables,
        };

        let attempts = self.policy.retries.saturating_add(1);
        let mut last_err = Error::Timeout;
        for attempt in 1..=attempts {
            match self.attempt(&request).await {
                Ok(data) => {
                    if let Some(cache) = &self.cache {
                        cache.store(key, data.clone());
                    }
                    return Ok(data);
                }
                Err(err) => {
                    warn!(attempt, attempts, error = %err, "content fetch failed");
                    let retryable = err.is_retryable();
                    last_err = err;
                    if !retryable {
                        break;
                    }
                }
            }
        }

        if let Some(stale) = self.cache.as_ref().and_then(|c| c.last_known_good(&key)) {
            warn!(error = %last_err, "serving last known good content");
            return Ok(stale);
        }

        if self.policy.fallback_on_error {
            warn!(error = %last_err, "content fetch failed, using empty fallback");
            return Ok(Value::Object(Map::new()));
        }

        Err(last_err)
    }

    async fn attempt(&self, request: &GraphqlRequest) -> Result<Value> {
        let sequence = self.limiter.acquire().await;
        debug!(request = sequence, "fetching from content API");

        let execute = self.transport.execute(request);
        let response = match tokio::time::timeout(self.policy.timeout, execute).await {
            Ok(result) => result?,
            Err(_) => return Err(Error::Timeout),
        };
        response.into_data()
    }
}

#[async_trait]
impl ContentSource for ContentClient {
    async fn slugs(&self, kind: ContentKind) -> Result<Vec<ContentItem>> {
        let data = self
            .fetch(&queries::slug_query(kind), None, CacheHint::revalidate(LIST_REVALIDATE))
            .await?;
        wire::decode_collection(&data, kind)
    }

    async fn collection(&self, kind: ContentKind) -> Result<Vec<ContentItem>> {
        let data = self
            .fetch(&queries::list_query(kind), None, CacheHint::revalidate(LIST_REVALIDATE))
            .await?;
        wire::decode_collection(&data, kind)
    }

    async fn item(&self, kind: ContentKind, slug: &str) -> Result<Option<ContentItem>> {
        let data = self
            .fetch(
                &queries::item_query(kind),
                Some(json!({ "slug": slug })),
                CacheHint::revalidate(ITEM_REVALIDATE),
            )
            .await?;
        wire::decode_item(&data, kind)
    }

    async fn hub_index(&self) -> Result<HubIndex> {
        let data = self
            .fetch(&queries::hub_index_query(), None, CacheHint::revalidate(LIST_REVALIDATE))
            .await?;
        wire::decode_hub_index(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphqlResponse;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    /// Replays a fixed script of outcomes, then keeps failing
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<GraphqlResponse>>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<GraphqlResponse>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn execute(&self, _request: &GraphqlRequest) -> Result<GraphqlResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Transport("connection refused".to_string())))
        }
    }

    /// Never answers
    struct HangingTransport;

    #[async_trait]
    impl Transport for HangingTransport {
        async fn execute(&self, _request: &GraphqlRequest) -> Result<GraphqlResponse> {
            std::future::pending().await
        }
    }

    /// Answers every item lookup with "no such item"
    struct MissingItemTransport;

    #[async_trait]
    impl Transport for MissingItemTransport {
        async fn execute(&self, _request: &GraphqlRequest) -> Result<GraphqlResponse> {
            Ok(GraphqlResponse::with_data(json!({"service": null})))
        }
    }

    fn policy(retries: u32, fallback_on_error: bool) -> FetchPolicy {
        FetchPolicy {
            timeout: Duration::from_secs(1),
            retries,
            fallback_on_error,
        }
    }

    fn client(transport: Arc<dyn Transport>, policy: FetchPolicy) -> ContentClient {
        ContentClient::new(transport, Arc::new(RateLimiter::unlimited()), policy)
    }

    fn fail() -> Result<GraphqlResponse> {
        Err(Error::Transport("connection reset".to_string()))
    }

    fn ok(data: Value) -> Result<GraphqlResponse> {
        Ok(GraphqlResponse::with_data(data))
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_two_failures() {
        let transport = ScriptedTransport::new(vec![fail(), fail(), ok(json!({"ok": true}))]);
        let client = client(transport.clone(), policy(2, false));

        let data = client.fetch("query { ok }", None, CacheHint::NONE).await.unwrap();
        assert_eq!(data, json!({"ok": true}));
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_returns_empty_object() {
        let transport = ScriptedTransport::new(vec![]);
        let client = client(transport.clone(), policy(1, true));

        let data = client.fetch("query { ok }", None, CacheHint::NONE).await.unwrap();
        assert_eq!(data, json!({}));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_propagate_without_fallback() {
        let transport = ScriptedTransport::new(vec![]);
        let client = client(transport.clone(), policy(1, false));

        let result = client.fetch("query { ok }", None, CacheHint::NONE).await;
        assert!(matches!(result, Err(Error::Transport(_))));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_list_triggers_retry() {
        let with_errors = GraphqlResponse {
            data: Some(json!({"services": null})),
            errors: Some(vec![crate::GraphqlError {
                message: "Internal server error".to_string(),
            }]),
        };
        let transport =
            ScriptedTransport::new(vec![Ok(with_errors), ok(json!({"services": {"nodes": []}}))]);
        let client = client(transport.clone(), policy(1, false));

        let data = client.fetch("query { services }", None, CacheHint::NONE).await.unwrap();
        assert_eq!(data, json!({"services": {"nodes": []}}));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_list_alone_is_failure() {
        let with_errors = GraphqlResponse {
            data: None,
            errors: Some(vec![crate::GraphqlError {
                message: "denied".to_string(),
            }]),
        };
        let transport = ScriptedTransport::new(vec![Ok(with_errors)]);
        let client = client(transport, policy(0, false));

        let result = client.fetch("query { x }", None, CacheHint::NONE).await;
        assert!(matches!(result, Err(Error::Graphql(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_attempt_is_bounded_by_timeout() {
        let client = client(Arc::new(HangingTransport), policy(1, false));
        let start = Instant::now();

        let result = client.fetch("query { x }", None, CacheHint::NONE).await;
        assert!(matches!(result, Err(Error::Timeout)));
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_respect_rate_limit() {
        let transport = ScriptedTransport::new(vec![fail(), fail(), ok(json!({}))]);
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(300)));
        let client = ContentClient::new(transport, Arc::clone(&limiter), policy(2, false));
        let start = Instant::now();

        client.fetch("query { x }", None, CacheHint::NONE).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(600));
        assert_eq!(limiter.request_count().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_cache_skips_backend() {
        let transport = ScriptedTransport::new(vec![ok(json!({"n": 1})), ok(json!({"n": 2}))]);
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(60)));
        let client = client(transport.clone(), policy(0, false)).with_cache(cache);

        assert_eq!(client.fetch("q", None, CacheHint::NONE).await.unwrap(), json!({"n": 1}));
        assert_eq!(client.fetch("q", None, CacheHint::NONE).await.unwrap(), json!({"n": 1}));
        assert_eq!(transport.calls(), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(client.fetch("q", None, CacheHint::NONE).await.unwrap(), json!({"n": 2}));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_known_good_survives_refresh_failure() {
        let transport = ScriptedTransport::new(vec![ok(json!({"n": 1}))]);
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(60)));
        let client = client(transport.clone(), policy(1, false)).with_cache(cache);

        client.fetch("q", None, CacheHint::NONE).await.unwrap();
        tokio::time::advance(Duration::from_secs(120)).await;

        let data = client.fetch("q", None, CacheHint::NONE).await.unwrap();
        assert_eq!(data, json!({"n": 1}));
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_slugs_keep_cache_bounded() {
        let cache = Arc::new(ResponseCache::with_capacity(Duration::from_secs(60), 16));
        let client = client(Arc::new(MissingItemTransport), policy(0, false))
            .with_cache(Arc::clone(&cache));

        for n in 0..300 {
            let slug = format!("no-such-device-{n}");
            assert!(client.item(ContentKind::Service, &slug).await.unwrap().is_none());
        }

        assert!(cache.len() <= 16);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typed_item_lookup() {
        let transport = ScriptedTransport::new(vec![ok(json!({
            "service": {"slug": "buy-iphone", "status": "publish", "title": "Buy iPhone"}
        }))]);
        let client = client(transport, policy(0, false));

        let item = client.item(ContentKind::Service, "buy-iphone").await.unwrap().unwrap();
        assert_eq!(item.title, "Buy iPhone");
    }

    #[tokio::test(start_paused = true)]
    async fn test_typed_collection_under_fallback_is_empty() {
        let client = client(ScriptedTransport::new(vec![]), policy(0, true));
        assert!(client.slugs(ContentKind::Service).await.unwrap().is_empty());
        assert!(client.item(ContentKind::Service, "x").await.unwrap().is_none());
        assert_eq!(client.hub_index().await.unwrap(), HubIndex::default());
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        let result = ContentClient::from_config(&HubConfig::default());
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }
}
