//! Network-first strategies for navigations and API GETs.

use super::StrategyCtx;
use ombra_client::{Request, Response};
use ombra_core::Error;

/// HTML navigation: prefer the network, fall back to the cached copy of this
/// exact page, then to the offline fallback document. Only when all three are
/// unavailable does the network error propagate.
pub async fn navigation(ctx: &StrategyCtx, req: &Request) -> Result<Response, Error> {
    match ctx.network.fetch(req).await {
        Ok(resp) => {
            ctx.store_copy(&ctx.runtime_partition, req, &resp).await;
            Ok(resp)
        }
        Err(net_err) => {
            tracing::debug!(url = %req.url, error = %net_err, "navigation fetch failed, consulting cache");
            if let Some(cached) = ctx.match_any(req).await? {
                return Ok(cached);
            }
            if let Some(offline) = ctx.match_offline().await? {
                return Ok(offline);
            }
            Err(net_err)
        }
    }
}

/// Same-origin API GET: prefer the network, fall back to the `api` partition.
/// A miss there propagates the network error to the caller.
pub async fn api(ctx: &StrategyCtx, req: &Request) -> Result<Response, Error> {
    match ctx.network.fetch(req).await {
        Ok(resp) => {
            ctx.store_copy(&ctx.api_partition, req, &resp).await;
            Ok(resp)
        }
        Err(net_err) => {
            tracing::debug!(url = %req.url, error = %net_err, "api fetch failed, consulting cache");
            match ctx.match_partition(&ctx.api_partition, req).await? {
                Some(cached) => Ok(cached),
                None => Err(net_err),
            }
        }
    }
}
