//! Stale-while-revalidate strategy for script/style/font destinations.

use super::StrategyCtx;
use ombra_client::{Request, Response};
use ombra_core::Error;

/// Return the cached copy immediately when present, refreshing the runtime
/// partition in a background task for next time. With no cached copy, the
/// network result is awaited, stored, and returned.
///
/// The refresh task is fire-and-forget: if the host shuts down first it is
/// simply abandoned, and a refresh failure leaves the stale entry in place.
pub async fn stale_while_revalidate(ctx: &StrategyCtx, req: &Request) -> Result<Response, Error> {
    let cached = ctx.match_any(req).await?;

    match cached {
        Some(hit) => {
            let ctx = ctx.clone();
            let req = req.clone();
            tokio::spawn(async move {
                match ctx.network.fetch(&req).await {
                    Ok(fresh) => ctx.store_copy(&ctx.runtime_partition, &req, &fresh).await,
                    Err(e) => tracing::debug!(url = %req.url, error = %e, "background revalidation failed"),
                }
            });
            Ok(hit)
        }
        None => {
            let resp = ctx.network.fetch(req).await?;
            ctx.store_copy(&ctx.runtime_partition, req, &resp).await;
            Ok(resp)
        }
    }
}
