use moka::sync::Cache;
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

/// Upper bound on distinct query/variable pairs kept in memory
const DEFAULT_MAX_ENTRIES: u64 = 10_000;

#[derive(Clone)]
struct CachedValue {
    value: Value,
    stored_at: Instant,
}

/// Responses keyed by query and variables.
///
/// An entry younger than its TTL is served without a backend call. Older
/// entries are kept as the last known good value for when a refresh fails,
/// until capacity pressure evicts them.
pub struct ResponseCache {
    default_ttl: Duration,
    entries: Cache<String, CachedValue>,
}

impl ResponseCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_capacity(default_ttl, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(default_ttl: Duration, max_entries: u64) -> Self {
        let entries = Cache::builder().max_capacity(max_entries).build();
        Self {
            default_ttl,
            entries,
        }
    }

    pub fn key(query: &str, variables: Option<&Value>) -> String {
        match variables {
            Some(vars) => format!("{}\n{}", query, vars),
            None => query.to_string(),
        }
    }

    /// Cached value if younger than `ttl` (or the default TTL)
    pub fn get_fresh(&self, key: &str, ttl: Option<Duration>) -> Option<Value> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        self.entries
            .get(key)
            .filter(|cached| cached.stored_at.elapsed() < ttl)
            .map(|cached| cached.value)
    }

    /// Cached value regardless of age
    pub fn last_known_good(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|cached| cached.value)
    }

    pub fn store(&self, key: String, value: Value) {
        self.entries.insert(
            key,
            CachedValue {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Entry count after pending evictions are applied
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
