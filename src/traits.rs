//! Common trait definitions
//!
//! Defines traits for dependency injection and testing, abstracting the two
//! external collaborators: the grade-scale resolver (scoring library) and the
//! GraphQL query client. These traits enable mocking and testing of external
//! dependencies.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::scales::{GradeScaleId, Score};

/// Trait for grade-scale resolution
///
/// Abstracts the external grading library that knows scale names and how to
/// score a grade string against a scale. This crate never computes scores
/// itself. Production code wires a real resolver; tests use mocks.
pub trait ScaleResolver: Send + Sync {
    /// Human-readable name of a scale, or `None` if the resolver does not
    /// know the scale
    fn scale_name(&self, scale: GradeScaleId) -> Option<String>;

    /// Scores a user-entered grade string against a scale
    ///
    /// Returns `None` when the scale is unknown or the input cannot be
    /// resolved at all. A negative `Score::Value` also means the input did
    /// not parse as a grade on that scale.
    fn score(&self, scale: GradeScaleId, input: &str) -> Option<Score>;
}

/// Trait for remote query operations
///
/// Defines the operations this crate needs from a GraphQL client: executing
/// a parameterized query with cache-first semantics, and reading/writing
/// cached fragments by key. Can be implemented by mock objects for testing.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Executes a query with the given variables and returns the `data`
    /// portion of the response
    async fn query(&self, query: &str, variables: Value) -> Result<Value>;

    /// Reads a cached fragment by its cache key
    ///
    /// Returns `None` on a cache miss.
    fn read_fragment(&self, cache_key: &str) -> Option<Value>;

    /// Writes a fragment into the cache under the given key
    fn write_fragment(&self, cache_key: &str, value: Value);
}
