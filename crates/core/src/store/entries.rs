//! Partition and entry operations.
//!
//! Provides creation and seeding of named partitions, upsert/lookup of stored
//! responses, and the version-boundary bulk eviction.

use super::connection::CacheStore;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A response stored in a cache partition.
///
/// Carries everything needed to replay the response to a later request with
/// the same descriptor. Opaque entries (cross-origin, no CORS) keep their body
/// bytes but record status 0 and no headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResponse {
    pub partition_name: String,
    pub key: String,
    pub method: String,
    pub url: String,
    pub accept: String,
    pub status: u16,
    pub headers_json: String,
    pub body: Vec<u8>,
    pub opaque: bool,
    pub stored_at: String,
}

impl CacheStore {
    /// Create a partition if it doesn't already exist.
    pub async fn open_partition(&self, name: &str) -> Result<(), Error> {
        let name = name.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO partitions (name, created_at) VALUES (?1, ?2)",
                    params![name, now],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Create a partition and write a batch of entries in one transaction.
    ///
    /// Either every entry lands or none does; a failure rolls the whole batch
    /// back, leaving the store as it was. This is the all-or-nothing write
    /// behind the install phase.
    pub async fn seed_partition(&self, name: &str, rows: Vec<StoredResponse>) -> Result<(), Error> {
        let name = name.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction().map_err(Error::from)?;
                tx.execute(
                    "INSERT OR IGNORE INTO partitions (name, created_at) VALUES (?1, ?2)",
                    params![name, now],
                )?;
                for row in &rows {
                    tx.execute(
                        "INSERT INTO entries (
                            partition_name, key, method, url, accept,
                            status, headers_json, body, opaque, stored_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                        ON CONFLICT(partition_name, key) DO UPDATE SET
                            method = excluded.method,
                            url = excluded.url,
                            accept = excluded.accept,
                            status = excluded.status,
                            headers_json = excluded.headers_json,
                            body = excluded.body,
                            opaque = excluded.opaque,
                            stored_at = excluded.stored_at",
                        params![
                            &name,
                            &row.key,
                            &row.method,
                            &row.url,
                            &row.accept,
                            row.status as i64,
                            &row.headers_json,
                            &row.body,
                            row.opaque as i32,
                            &row.stored_at,
                        ],
                    )?;
                }
                tx.commit().map_err(Error::from)?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update a single entry, creating its partition if needed.
    ///
    /// Uses UPSERT semantics on (partition, key): last writer wins.
    pub async fn put(&self, entry: &StoredResponse) -> Result<(), Error> {
        let entry = entry.clone();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO partitions (name, created_at) VALUES (?1, ?2)",
                    params![entry.partition_name, now],
                )?;
                conn.execute(
                    "INSERT INTO entries (
                        partition_name, key, method, url, accept,
                        status, headers_json, body, opaque, stored_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                    ON CONFLICT(partition_name, key) DO UPDATE SET
                        method = excluded.method,
                        url = excluded.url,
                        accept = excluded.accept,
                        status = excluded.status,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        opaque = excluded.opaque,
                        stored_at = excluded.stored_at",
                    params![
                        &entry.partition_name,
                        &entry.key,
                        &entry.method,
                        &entry.url,
                        &entry.accept,
                        entry.status as i64,
                        &entry.headers_json,
                        &entry.body,
                        entry.opaque as i32,
                        &entry.stored_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Look up an entry by descriptor key in a specific partition.
    pub async fn get(&self, partition: &str, key: &str) -> Result<Option<StoredResponse>, Error> {
        let partition = partition.to_string();
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<StoredResponse>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT partition_name, key, method, url, accept,
                            status, headers_json, body, opaque, stored_at
                     FROM entries WHERE partition_name = ?1 AND key = ?2",
                )?;
                let result = stmt.query_row(params![partition, key], row_to_entry);
                match result {
                    Ok(e) => Ok(Some(e)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Look up an entry by descriptor key across all partitions.
    ///
    /// Partitions are consulted in creation order, so entries seeded into the
    /// core partition at install win over later runtime copies.
    pub async fn get_any(&self, key: &str) -> Result<Option<StoredResponse>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<StoredResponse>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT e.partition_name, e.key, e.method, e.url, e.accept,
                            e.status, e.headers_json, e.body, e.opaque, e.stored_at
                     FROM entries e
                     JOIN partitions p ON p.name = e.partition_name
                     WHERE e.key = ?1
                     ORDER BY p.created_at ASC, p.name ASC
                     LIMIT 1",
                )?;
                let result = stmt.query_row(params![key], row_to_entry);
                match result {
                    Ok(e) => Ok(Some(e)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// List all partition names, in creation order.
    pub async fn partition_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM partitions ORDER BY created_at ASC, name ASC")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every partition whose name is not in `keep`, entries included.
    ///
    /// This is the sole eviction mechanism: all-or-nothing at the version
    /// boundary. An empty `keep` deletes every partition. Returns the number
    /// of partitions deleted.
    pub async fn drop_partitions_except(&self, keep: &[String]) -> Result<u64, Error> {
        let keep = keep.to_vec();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                if keep.is_empty() {
                    let deleted = conn.execute("DELETE FROM partitions", [])?;
                    return Ok(deleted as u64);
                }
                let placeholders = (1..=keep.len()).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ");
                let sql = format!("DELETE FROM partitions WHERE name NOT IN ({placeholders})");
                let deleted = conn.execute(&sql, rusqlite::params_from_iter(keep.iter()))?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of entries in one partition.
    pub async fn entry_count(&self, partition: &str) -> Result<u64, Error> {
        let partition = partition.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM entries WHERE partition_name = ?1",
                    params![partition],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Total number of entries across all partitions.
    pub async fn total_entries(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> Result<StoredResponse, rusqlite::Error> {
    Ok(StoredResponse {
        partition_name: row.get(0)?,
        key: row.get(1)?,
        method: row.get(2)?,
        url: row.get(3)?,
        accept: row.get(4)?,
        status: row.get::<_, i64>(5)? as u16,
        headers_json: row.get(6)?,
        body: row.get(7)?,
        opaque: row.get::<_, i32>(8)? == 1,
        stored_at: row.get(9)?,
    })
}
