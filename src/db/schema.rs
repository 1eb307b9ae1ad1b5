//! SQL DDL for all gazetteer tables.
//!
//! Defines the `locations`, `architectural_features`, `historical_events`,
//! and `relationships` tables, their vec0 companion tables (`features_vec`,
//! `events_vec`), and `schema_meta`. All DDL uses `IF NOT EXISTS` for
//! idempotent initialization.
//!
//! Deleting a location cascades to its features, events, and any relationship
//! edge that touches it. Vec rows are removed by the write path in the same
//! transaction, since virtual tables cannot carry foreign keys.

use rusqlite::Connection;

/// All schema DDL statements for the core tables.
const SCHEMA_SQL: &str = r#"
-- Points of interest
CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    location_type TEXT NOT NULL,
    lon REAL NOT NULL CHECK(lon >= -180.0 AND lon <= 180.0),
    lat REAL NOT NULL CHECK(lat >= -90.0 AND lat <= 90.0),
    properties TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_locations_type ON locations(location_type);
CREATE INDEX IF NOT EXISTS idx_locations_lat_lon ON locations(lat, lon);

-- Architectural attributes, one-to-many from locations
CREATE TABLE IF NOT EXISTS architectural_features (
    id INTEGER PRIMARY KEY,
    location_id INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
    style TEXT NOT NULL,
    year_built INTEGER,
    architect TEXT,
    description TEXT,
    properties TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_features_location ON architectural_features(location_id);
CREATE INDEX IF NOT EXISTS idx_features_style ON architectural_features(style);

-- Historical events, one-to-many from locations
CREATE TABLE IF NOT EXISTS historical_events (
    id INTEGER PRIMARY KEY,
    location_id INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
    event_date TEXT NOT NULL,
    event_type TEXT NOT NULL,
    description TEXT NOT NULL,
    properties TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_events_location ON historical_events(location_id);
CREATE INDEX IF NOT EXISTS idx_events_date ON historical_events(event_date);

-- Directed edges between locations
CREATE TABLE IF NOT EXISTS relationships (
    id INTEGER PRIMARY KEY,
    from_location_id INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
    to_location_id INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
    relationship_type TEXT NOT NULL,
    strength REAL,
    evidence TEXT,
    properties TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_relationships_from ON relationships(from_location_id);
CREATE INDEX IF NOT EXISTS idx_relationships_to ON relationships(to_location_id);
CREATE INDEX IF NOT EXISTS idx_relationships_type ON relationships(relationship_type);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// vec0 virtual tables must be created separately (sqlite-vec syntax).
/// Rows are keyed by the owning record's id; a record with no embedding
/// simply has no vec row and is invisible to similarity search.
const VEC_TABLES_SQL: &str = r#"
CREATE VIRTUAL TABLE IF NOT EXISTS features_vec USING vec0(
    id INTEGER PRIMARY KEY,
    embedding FLOAT[384] distance_metric=cosine
);

CREATE VIRTUAL TABLE IF NOT EXISTS events_vec USING vec0(
    id INTEGER PRIMARY KEY,
    embedding FLOAT[384] distance_metric=cosine
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute_batch(VEC_TABLES_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
