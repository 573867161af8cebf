//! SQLite-backed partitioned response store.
//!
//! This module provides the persistent cache partitions the request proxy
//! serves from, using SQLite with async access via tokio-rusqlite:
//!
//! - Named partitions (`core-<version>`, `runtime-<version>`, `api-<version>`)
//! - Request-descriptor keys hashed with SHA-256
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Bulk eviction of partitions from stale versions

pub mod connection;
pub mod entries;
pub mod key;
pub mod migrations;

pub use crate::Error;

pub use connection::CacheStore;
pub use entries::StoredResponse;
pub use key::descriptor_key;
