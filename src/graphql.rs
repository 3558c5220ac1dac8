//! GraphQL query client
//!
//! Executes parameterized queries against the climbing-data API with
//! cache-first semantics, and keeps a keyed fragment cache for direct reads
//! of previously fetched records. Caching here is plain keyed LRU storage;
//! response normalization is the upstream API client library's concern and
//! is deliberately not reimplemented.

use anyhow::Result;
use async_trait::async_trait;
use lru::LruCache;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use tokio::sync::Mutex as AsyncMutex;

use crate::traits::QueryClient;

/// Entries kept in the query response cache
const RESPONSE_CACHE_SIZE: usize = 100;
/// Entries kept in the fragment cache
const FRAGMENT_CACHE_SIZE: usize = 500;

/// GraphQL HTTP response envelope
#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphqlErrorEntry>>,
}

/// A single entry of the response `errors` array
#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

/// Client for the climbing-data GraphQL endpoint
///
/// Provides query execution with LRU response caching to minimize network
/// requests, plus a fragment cache for reading individual records by key.
pub struct GraphqlClient {
    /// HTTP client for making requests
    client: Client,
    /// URL of the GraphQL endpoint
    endpoint: String,
    /// LRU cache mapping serialized requests to response data
    responses: AsyncMutex<LruCache<String, Value>>,
    /// LRU cache mapping fragment keys to cached records
    fragments: Mutex<LruCache<String, Value>>,
}

impl GraphqlClient {
    /// Creates a new client for the given endpoint
    ///
    /// # Arguments
    /// - `endpoint` - URL of the GraphQL endpoint (e.g., `<https://api.example.com/graphql>`)
    ///
    /// # Returns
    /// A configured client with TLS verification enabled
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(false) // Explicitly require valid certificates
            .use_rustls_tls()
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            responses: AsyncMutex::new(LruCache::new(
                NonZeroUsize::new(RESPONSE_CACHE_SIZE).unwrap(),
            )),
            fragments: Mutex::new(LruCache::new(
                NonZeroUsize::new(FRAGMENT_CACHE_SIZE).unwrap(),
            )),
        })
    }

    /// Executes a query with cache-first semantics
    ///
    /// Checks the response cache first; on a miss, POSTs the query and
    /// variables to the endpoint and caches the `data` portion of the result.
    ///
    /// # Arguments
    /// - `query` - The GraphQL document to execute
    /// - `variables` - Variables object for the query
    ///
    /// # Returns
    /// The `data` portion of the response
    ///
    /// # Errors
    /// Returns an error if:
    /// - The HTTP request fails
    /// - The endpoint returns a non-200 status
    /// - The response carries GraphQL errors or no data
    pub async fn query(&self, query: &str, variables: Value) -> Result<Value> {
        let cache_key = format!("{}:{}", query, variables);

        // Check cache first
        {
            let mut cache = self.responses.lock().await;
            if let Some(data) = cache.get(&cache_key) {
                return Ok(data.clone());
            }
        }

        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(anyhow::anyhow!(
                "Query failed: HTTP {}",
                response.status()
            ));
        }

        let body: GraphqlResponse = response.json().await?;

        if let Some(errors) = body.errors {
            let message = errors
                .into_iter()
                .next()
                .map(|e| e.message)
                .unwrap_or_else(|| "unknown GraphQL error".to_string());
            return Err(anyhow::anyhow!("Query returned errors: {}", message));
        }

        let data = body
            .data
            .ok_or_else(|| anyhow::anyhow!("Query returned no data"))?;

        {
            let mut cache = self.responses.lock().await;
            cache.put(cache_key, data.clone());
        }

        Ok(data)
    }

    /// Reads a fragment from the cache by key
    ///
    /// # Returns
    /// The cached record, or `None` on a miss
    pub fn read_fragment(&self, cache_key: &str) -> Option<Value> {
        let mut fragments = self.fragments.lock().ok()?;
        fragments.get(cache_key).cloned()
    }

    /// Writes a fragment into the cache
    pub fn write_fragment(&self, cache_key: &str, value: Value) {
        if let Ok(mut fragments) = self.fragments.lock() {
            fragments.put(cache_key.to_string(), value);
        }
    }
}

#[async_trait]
impl QueryClient for GraphqlClient {
    async fn query(&self, query: &str, variables: Value) -> Result<Value> {
        self.query(query, variables).await
    }

    fn read_fragment(&self, cache_key: &str) -> Option<Value> {
        self.read_fragment(cache_key)
    }

    fn write_fragment(&self, cache_key: &str, value: Value) {
        self.write_fragment(cache_key, value)
    }
}
