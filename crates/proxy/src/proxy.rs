//! The request proxy: lifecycle and per-request dispatch.

use std::sync::Arc;

use crate::classify::{Strategy, classify};
use crate::strategy::StrategyCtx;
use crate::{manifest, strategy};
use ombra_client::net::url::resolve;
use ombra_client::{HttpNetwork, Network, Request, Response};
use ombra_core::{CacheStore, Error, ProxyConfig};
use url::Url;

/// The request cache proxy.
///
/// Constructed once at startup and shared by reference across request tasks;
/// all state lives in the store and is safe for concurrent use. Hosts call
/// `install` once per new version, `activate` when that version takes over,
/// and `handle` for every outgoing request thereafter. Interception must not
/// start before `activate` returns, or a request could be served from a
/// partition about to be purged.
pub struct RequestProxy {
    config: ProxyConfig,
    origin: Url,
    ctx: StrategyCtx,
}

impl RequestProxy {
    /// Build a proxy from parts.
    pub fn new(config: ProxyConfig, store: CacheStore, network: Arc<dyn Network>) -> Result<Self, Error> {
        let origin = Url::parse(&config.origin).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let offline_key = Request::navigation(resolve(&origin, &config.offline_path)?).key();
        let ctx = StrategyCtx {
            store,
            network,
            runtime_partition: config.runtime_partition(),
            api_partition: config.api_partition(),
            offline_key,
        };
        Ok(Self { config, origin, ctx })
    }

    /// Open the store at the configured path and build the proxy over the
    /// production HTTP backend.
    pub async fn open(config: ProxyConfig) -> Result<Self, Error> {
        let store = CacheStore::open(&config.db_path).await?;
        let network = Arc::new(HttpNetwork::new(&config)?);
        Self::new(config, store, network)
    }

    /// The store backing the cache partitions.
    pub fn store(&self) -> &CacheStore {
        &self.ctx.store
    }

    /// The active configuration.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Install phase: seed the core partition from the fixed manifest.
    ///
    /// All manifest URLs are fetched first and written in one transaction, so
    /// a single unreachable URL aborts the install with zero entries retained.
    /// A partially seeded shell is worse than none: the offline fallback page
    /// assumes every baseline asset is present.
    ///
    /// Returning `Ok` signals readiness for immediate activation; there is no
    /// wait for other clients of the previous version.
    pub async fn install(&self) -> Result<(), Error> {
        let partition = self.config.core_partition();

        let mut staged = Vec::with_capacity(manifest::CORE_MANIFEST.len());
        for entry in manifest::CORE_MANIFEST {
            let req = manifest::manifest_request(&self.origin, entry)?;
            let resp = self
                .ctx
                .network
                .fetch(&req)
                .await
                .map_err(|e| Error::InstallAborted(format!("{entry}: {e}")))?;
            staged.push(resp.to_stored(&partition, &req));
        }

        self.ctx.store.seed_partition(&partition, staged).await?;

        tracing::info!(
            partition,
            assets = manifest::CORE_MANIFEST.len(),
            "install complete, ready to activate"
        );
        Ok(())
    }

    /// Activation phase: take over traffic for the current version.
    ///
    /// Ensures the three current partitions exist, then deletes every
    /// partition from any other version. Eviction is all-or-nothing at this
    /// boundary; there is no per-entry TTL or LRU. Returns the number of
    /// partitions purged. Interception may begin as soon as this returns.
    pub async fn activate(&self) -> Result<u64, Error> {
        for name in self.config.current_partitions() {
            self.ctx.store.open_partition(&name).await?;
        }

        let keep = self.config.current_partitions();
        let purged = self.ctx.store.drop_partitions_except(&keep).await?;

        tracing::info!(version = %self.config.version, purged, "activated");
        Ok(purged)
    }

    /// Handle one intercepted request.
    ///
    /// Returns `Ok(Some(response))` when a strategy produced a response,
    /// `Ok(None)` when the request is not intercepted and the host should
    /// perform a plain fetch, and `Err` when the strategy's fallback chain was
    /// exhausted (visible to the host as a failed fetch).
    pub async fn handle(&self, req: &Request) -> Result<Option<Response>, Error> {
        let decision = classify(&self.origin, &self.config, req);
        tracing::debug!(url = %req.url, strategy = ?decision, "dispatch");

        match decision {
            Strategy::Navigation => strategy::navigation(&self.ctx, req).await.map(Some),
            Strategy::Api => strategy::api(&self.ctx, req).await.map(Some),
            Strategy::Static => strategy::static_asset(&self.ctx, req).await.map(Some),
            Strategy::Revalidate => strategy::stale_while_revalidate(&self.ctx, req).await.map(Some),
            Strategy::Passthrough => Ok(None),
        }
    }
}
