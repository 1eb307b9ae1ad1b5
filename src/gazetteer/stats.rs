use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

use crate::gazetteer::error::Result;

/// Summary counts for the gazetteer store.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub locations: u64,
    pub architectural_features: u64,
    pub features_with_embedding: u64,
    pub historical_events: u64,
    pub relationships: u64,
    pub influence_edges: u64,
    pub db_size_bytes: u64,
}

/// Compute store statistics.
///
/// `db_path` is used for file size calculation; pass None for in-memory
/// databases.
pub fn gazetteer_stats(conn: &Connection, db_path: Option<&Path>) -> Result<StatsResponse> {
    let db_size_bytes = db_path
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .unwrap_or(0);

    Ok(StatsResponse {
        locations: count(conn, "SELECT COUNT(*) FROM locations")?,
        architectural_features: count(conn, "SELECT COUNT(*) FROM architectural_features")?,
        features_with_embedding: count(conn, "SELECT COUNT(*) FROM features_vec")?,
        historical_events: count(conn, "SELECT COUNT(*) FROM historical_events")?,
        relationships: count(conn, "SELECT COUNT(*) FROM relationships")?,
        influence_edges: count(
            conn,
            "SELECT COUNT(*) FROM relationships WHERE relationship_type = 'influences'",
        )?,
        db_size_bytes,
    })
}

fn count(conn: &Connection, sql: &str) -> Result<u64> {
    let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(n as u64)
}
