use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::models::Candidate;
use crate::services::source::{CandidatePoolSource, FetchError};

/// Candidate pool source with an in-memory TTL cache in front
///
/// Pools are cached per viewer, since each excludes the viewer's own
/// profile. Only fetched pools are cached, never ranking results; a pool
/// may be up to `ttl_secs` stale.
pub struct CachedPoolSource<S> {
    inner: S,
    pools: moka::future::Cache<String, Arc<Vec<Candidate>>>,
}

impl<S: CandidatePoolSource> CachedPoolSource<S> {
    /// Create a new cached source
    pub fn new(inner: S, max_entries: u64, ttl_secs: u64) -> Self {
        let pools = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, pools }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop the cached pool for one viewer
    pub async fn invalidate(&self, viewer_id: &str) {
        self.pools.invalidate(viewer_id).await;
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.pools.entry_count(),
        }
    }
}

#[async_trait]
impl<S: CandidatePoolSource> CandidatePoolSource for CachedPoolSource<S> {
    async fn fetch(&self, viewer_id: &str) -> Result<Vec<Candidate>, FetchError> {
        if let Some(pool) = self.pools.get(viewer_id).await {
            tracing::trace!("Pool cache hit: {}", viewer_id);
            return Ok(pool.as_ref().clone());
        }

        tracing::trace!("Pool cache miss: {}", viewer_id);
        let pool = self.inner.fetch(viewer_id).await?;
        self.pools
            .insert(viewer_id.to_string(), Arc::new(pool.clone()))
            .await;

        Ok(pool)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: u64,
}
