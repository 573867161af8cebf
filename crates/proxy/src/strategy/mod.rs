//! Caching strategies.
//!
//! Each strategy is an async function with the same shape — a request in, an
//! eventual response out — over a shared context holding the store, the
//! network backend, and the current partition names. The dispatcher composes
//! them with the classifier; nothing here knows about event dispatch.

pub mod cache_first;
pub mod network_first;
pub mod revalidate;

use std::sync::Arc;

use ombra_client::{Network, Request, Response};
use ombra_core::{CacheStore, Error};

pub use cache_first::static_asset;
pub use network_first::{api, navigation};
pub use revalidate::stale_while_revalidate;

/// Shared state the strategies operate over.
///
/// Cheap to clone: the store handle shares one connection and the network is
/// behind an `Arc`. Clones are what stale-while-revalidate hands to its
/// background refresh task.
#[derive(Clone)]
pub struct StrategyCtx {
    pub store: CacheStore,
    pub network: Arc<dyn Network>,
    pub runtime_partition: String,
    pub api_partition: String,
    /// Descriptor key of the offline fallback document in the core partition.
    pub offline_key: String,
}

impl StrategyCtx {
    /// Store a clone of `resp` under `req`'s descriptor.
    ///
    /// The caller keeps the original response untouched. Write failures are
    /// logged and swallowed: a response the network already produced is never
    /// failed by a cache write.
    pub(crate) async fn store_copy(&self, partition: &str, req: &Request, resp: &Response) {
        let entry = resp.to_stored(partition, req);
        if let Err(e) = self.store.put(&entry).await {
            tracing::warn!(url = %req.url, partition, error = %e, "cache write failed");
        }
    }

    /// Cached match for this exact descriptor, from any partition.
    pub(crate) async fn match_any(&self, req: &Request) -> Result<Option<Response>, Error> {
        match self.store.get_any(&req.key()).await? {
            Some(entry) => Ok(Some(Response::from_stored(&entry)?)),
            None => Ok(None),
        }
    }

    /// Cached match for this exact descriptor, from one partition.
    pub(crate) async fn match_partition(&self, partition: &str, req: &Request) -> Result<Option<Response>, Error> {
        match self.store.get(partition, &req.key()).await? {
            Some(entry) => Ok(Some(Response::from_stored(&entry)?)),
            None => Ok(None),
        }
    }

    /// The cached offline fallback document, if install seeded it.
    pub(crate) async fn match_offline(&self) -> Result<Option<Response>, Error> {
        match self.store.get_any(&self.offline_key).await? {
            Some(entry) => Ok(Some(Response::from_stored(&entry)?)),
            None => Ok(None),
        }
    }
}
