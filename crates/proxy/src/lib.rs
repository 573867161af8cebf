//! Request cache proxy: strategy classification, cache partition lifecycle,
//! and the dispatcher that ties them together.
//!
//! The proxy intercepts outgoing requests from a host application, classifies
//! each one by its descriptor, and applies one of four caching strategies over
//! three versioned partitions (`core`, `runtime`, `api`):
//!
//! - HTML navigations: network-first with cache then offline-page fallback
//! - Same-origin API GETs: network-first with `api`-partition fallback
//! - Same-origin static assets: cache-first
//! - Script/style/font destinations: stale-while-revalidate
//!
//! Anything else is not intercepted. Partitions are seeded during install
//! (all-or-nothing manifest fetch) and evicted wholesale when a new version
//! activates.

pub mod classify;
pub mod manifest;
pub mod proxy;
pub mod strategy;

pub use classify::{Strategy, classify};
pub use proxy::RequestProxy;
