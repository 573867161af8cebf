//! Cache-first strategy for same-origin static assets.

use super::StrategyCtx;
use ombra_client::{Request, Response};
use ombra_core::Error;

/// Static asset: serve the cached copy when present; otherwise fetch, store a
/// copy into the runtime partition, and return the network response. A miss
/// followed by a network failure propagates the failure untouched.
pub async fn static_asset(ctx: &StrategyCtx, req: &Request) -> Result<Response, Error> {
    if let Some(cached) = ctx.match_any(req).await? {
        return Ok(cached);
    }

    let resp = ctx.network.fetch(req).await?;
    ctx.store_copy(&ctx.runtime_partition, req, &resp).await;
    Ok(resp)
}
