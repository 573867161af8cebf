//! Core types and shared functionality for the ombra request cache proxy.
//!
//! This crate provides:
//! - Partitioned response store with SQLite backend
//! - Unified error types
//! - Layered proxy configuration

pub mod config;
pub mod error;
pub mod store;

pub use config::ProxyConfig;
pub use error::Error;
pub use store::{CacheStore, StoredResponse};
