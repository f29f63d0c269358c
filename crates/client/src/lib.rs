//! Client for the headless content backend.
//!
//! All reads go through [`ContentClient`], which wraps a [`Transport`] with a
//! per-attempt timeout, bounded retry, a shared [`RateLimiter`], an optional
//! [`ResponseCache`] and an optional empty-result fallback. Consumers that only
//! need typed content depend on the [`ContentSource`] trait.

mod cache;
mod client;
mod http;
pub mod queries;
mod rate_limit;
mod wire;

pub use cache::ResponseCache;
pub use client::{CacheHint, ContentClient, FetchPolicy};
pub use http::HttpTransport;
pub use rate_limit::RateLimiter;

use async_trait::async_trait;
use content_hub_core::{ContentItem, ContentKind, Error, HubIndex, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body posted to the GraphQL endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
}

impl GraphqlResponse {
    pub fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: None,
        }
    }

    /// A 2xx response with a non-empty error list is still a failure.
    pub fn into_data(self) -> Result<Value> {
        if let Some(errors) = self.errors
            && !errors.is_empty()
        {
            return Err(Error::Graphql(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        Ok(match self.data {
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(data) => data,
        })
    }
}

/// One request/response exchange with the backend
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &GraphqlRequest) -> Result<GraphqlResponse>;
}

/// Typed read access to content
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Lightweight listing: slug, status, site and title only
    async fn slugs(&self, kind: ContentKind) -> Result<Vec<ContentItem>>;

    /// Full listing including bodies and category tags
    async fn collection(&self, kind: ContentKind) -> Result<Vec<ContentItem>>;

    /// Single item by slug, `None` when the backend has no such item
    async fn item(&self, kind: ContentKind, slug: &str) -> Result<Option<ContentItem>>;

    /// Every collection in one round trip
    async fn hub_index(&self) -> Result<HubIndex>;
}
