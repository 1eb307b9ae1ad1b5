//! Write path — inserts, updates, and deletes for all gazetteer entities.
//!
//! Validation happens here rather than relying on FK errors: features, events,
//! and relationship endpoints must reference existing locations, embeddings
//! must be exactly [`EMBEDDING_DIM`] floats, and self-loop edges are rejected.
//! Writes that touch both a row table and its vec0 companion run inside a
//! transaction.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::embedding::EMBEDDING_DIM;
use crate::gazetteer::error::{Error, Result};
use crate::gazetteer::types::{
    ArchitecturalFeature, HistoricalEvent, Location, LocationUpdate, NewEvent, NewFeature,
    NewLocation, NewRelationship, Relationship,
};
use crate::gazetteer::{embedding_to_bytes, now_rfc3339};

// ── Locations ─────────────────────────────────────────────────────────────────

/// Insert a new location and return the stored record.
pub fn create_location(conn: &Connection, new: &NewLocation) -> Result<Location> {
    validate_coordinates(new.lat, new.lon)?;

    let now = now_rfc3339();
    let properties = properties_json(new.properties)?;

    conn.execute(
        "INSERT INTO locations (name, description, location_type, lon, lat, properties, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        params![
            new.name,
            new.description,
            new.location_type,
            new.lon,
            new.lat,
            properties,
            now,
        ],
    )?;
    let id = conn.last_insert_rowid();

    tracing::debug!(id, name = new.name, "location created");
    get_location(conn, id)?.ok_or_else(|| Error::not_found("location", id))
}

/// Fetch a location by id.
pub fn get_location(conn: &Connection, id: i64) -> Result<Option<Location>> {
    let row = conn
        .query_row(
            "SELECT id, name, description, location_type, lon, lat, properties, created_at, updated_at \
             FROM locations WHERE id = ?1",
            params![id],
            location_from_row,
        )
        .optional()?;
    Ok(row)
}

/// List locations with pagination, ordered by id.
pub fn list_locations(conn: &Connection, offset: usize, limit: usize) -> Result<Vec<Location>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, location_type, lon, lat, properties, created_at, updated_at \
         FROM locations ORDER BY id LIMIT ?1 OFFSET ?2",
    )?;
    let rows = stmt
        .query_map(params![limit as i64, offset as i64], location_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Update a location's fields. Unset fields keep their current value (an
/// update can never clear a field to NULL); `updated_at` is always refreshed.
pub fn update_location(conn: &Connection, id: i64, update: &LocationUpdate) -> Result<Location> {
    let current = get_location(conn, id)?.ok_or_else(|| Error::not_found("location", id))?;

    let (lon, lat) = update.point.map_or((current.lon, current.lat), |(lo, la)| (lo, la));
    validate_coordinates(lat, lon)?;

    let properties = match update.properties {
        Some(p) => Some(serde_json::to_string(p).map_err(|e| Error::invalid(e.to_string()))?),
        None => current
            .properties
            .as_ref()
            .map(|p| serde_json::to_string(p).map_err(|e| Error::invalid(e.to_string())))
            .transpose()?,
    };

    conn.execute(
        "UPDATE locations SET name = ?1, description = ?2, location_type = ?3, lon = ?4, lat = ?5, \
         properties = ?6, updated_at = ?7 WHERE id = ?8",
        params![
            update.name.unwrap_or(&current.name),
            update.description.or(current.description.as_deref()),
            update.location_type.unwrap_or(&current.location_type),
            lon,
            lat,
            properties,
            now_rfc3339(),
            id,
        ],
    )?;

    get_location(conn, id)?.ok_or_else(|| Error::not_found("location", id))
}

/// Delete a location. Cascades to its features, events, and every relationship
/// edge touching it; vec rows are removed in the same transaction since
/// virtual tables carry no foreign keys.
pub fn delete_location(conn: &mut Connection, id: i64) -> Result<()> {
    let tx = conn.transaction()?;

    let exists: bool = tx.query_row(
        "SELECT COUNT(*) > 0 FROM locations WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(Error::not_found("location", id));
    }

    tx.execute(
        "DELETE FROM features_vec WHERE id IN \
         (SELECT id FROM architectural_features WHERE location_id = ?1)",
        params![id],
    )?;
    tx.execute(
        "DELETE FROM events_vec WHERE id IN \
         (SELECT id FROM historical_events WHERE location_id = ?1)",
        params![id],
    )?;
    tx.execute("DELETE FROM locations WHERE id = ?1", params![id])?;

    tx.commit()?;
    tracing::debug!(id, "location deleted");
    Ok(())
}

// ── Architectural features ────────────────────────────────────────────────────

/// Insert an architectural feature, plus its embedding vector when supplied.
pub fn create_feature(conn: &mut Connection, new: &NewFeature) -> Result<ArchitecturalFeature> {
    validate_embedding(new.embedding)?;

    let tx = conn.transaction()?;
    require_location(&tx, new.location_id)?;

    let now = now_rfc3339();
    let properties = properties_json(new.properties)?;

    tx.execute(
        "INSERT INTO architectural_features \
         (location_id, style, year_built, architect, description, properties, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        params![
            new.location_id,
            new.style,
            new.year_built,
            new.architect,
            new.description,
            properties,
            now,
        ],
    )?;
    let id = tx.last_insert_rowid();

    if let Some(embedding) = new.embedding {
        tx.execute(
            "INSERT INTO features_vec (id, embedding) VALUES (?1, ?2)",
            params![id, embedding_to_bytes(embedding)],
        )?;
    }

    let feature = tx.query_row(
        "SELECT id, location_id, style, year_built, architect, description, properties, created_at, updated_at \
         FROM architectural_features WHERE id = ?1",
        params![id],
        feature_from_row,
    )?;

    tx.commit()?;
    Ok(feature)
}

/// Fetch an architectural feature by id.
pub fn get_feature(conn: &Connection, id: i64) -> Result<Option<ArchitecturalFeature>> {
    let row = conn
        .query_row(
            "SELECT id, location_id, style, year_built, architect, description, properties, created_at, updated_at \
             FROM architectural_features WHERE id = ?1",
            params![id],
            feature_from_row,
        )
        .optional()?;
    Ok(row)
}

/// Delete an architectural feature and its vec row.
pub fn delete_feature(conn: &mut Connection, id: i64) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM features_vec WHERE id = ?1", params![id])?;
    let rows = tx.execute(
        "DELETE FROM architectural_features WHERE id = ?1",
        params![id],
    )?;
    if rows == 0 {
        return Err(Error::not_found("architectural feature", id));
    }
    tx.commit()?;
    Ok(())
}

// ── Historical events ─────────────────────────────────────────────────────────

/// Insert a historical event, plus its embedding vector when supplied.
pub fn create_event(conn: &mut Connection, new: &NewEvent) -> Result<HistoricalEvent> {
    validate_embedding(new.embedding)?;

    let tx = conn.transaction()?;
    require_location(&tx, new.location_id)?;

    let now = now_rfc3339();
    let properties = properties_json(new.properties)?;

    tx.execute(
        "INSERT INTO historical_events \
         (location_id, event_date, event_type, description, properties, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            new.location_id,
            new.event_date.to_string(),
            new.event_type,
            new.description,
            properties,
            now,
        ],
    )?;
    let id = tx.last_insert_rowid();

    if let Some(embedding) = new.embedding {
        tx.execute(
            "INSERT INTO events_vec (id, embedding) VALUES (?1, ?2)",
            params![id, embedding_to_bytes(embedding)],
        )?;
    }

    let event = tx.query_row(
        "SELECT id, location_id, event_date, event_type, description, properties, created_at, updated_at \
         FROM historical_events WHERE id = ?1",
        params![id],
        event_from_row,
    )?;

    tx.commit()?;
    Ok(event)
}

// ── Relationships ─────────────────────────────────────────────────────────────

/// Insert a directed relationship edge between two existing locations.
/// Self-loops are rejected: they carry no meaning for influence chains.
pub fn create_relationship(conn: &Connection, new: &NewRelationship) -> Result<Relationship> {
    if new.from_location_id == new.to_location_id {
        return Err(Error::invalid(format!(
            "self-loop relationship on location {}",
            new.from_location_id
        )));
    }
    require_location(conn, new.from_location_id)?;
    require_location(conn, new.to_location_id)?;

    let now = now_rfc3339();
    let properties = properties_json(new.properties)?;

    conn.execute(
        "INSERT INTO relationships \
         (from_location_id, to_location_id, relationship_type, strength, evidence, properties, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        params![
            new.from_location_id,
            new.to_location_id,
            new.relationship_type,
            new.strength,
            new.evidence,
            properties,
            now,
        ],
    )?;
    let id = conn.last_insert_rowid();

    let relationship = conn.query_row(
        "SELECT id, from_location_id, to_location_id, relationship_type, strength, evidence, properties, created_at, updated_at \
         FROM relationships WHERE id = ?1",
        params![id],
        relationship_from_row,
    )?;
    Ok(relationship)
}

/// Delete a relationship edge by id.
pub fn delete_relationship(conn: &Connection, id: i64) -> Result<()> {
    let rows = conn.execute("DELETE FROM relationships WHERE id = ?1", params![id])?;
    if rows == 0 {
        return Err(Error::not_found("relationship", id));
    }
    Ok(())
}

// ── Row mappers and validation helpers ────────────────────────────────────────

pub(crate) fn location_from_row(row: &Row) -> rusqlite::Result<Location> {
    let properties_str: Option<String> = row.get(6)?;
    Ok(Location {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        location_type: row.get(3)?,
        lon: row.get(4)?,
        lat: row.get(5)?,
        properties: properties_str.and_then(|s| serde_json::from_str(&s).ok()),
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub(crate) fn feature_from_row(row: &Row) -> rusqlite::Result<ArchitecturalFeature> {
    let properties_str: Option<String> = row.get(6)?;
    Ok(ArchitecturalFeature {
        id: row.get(0)?,
        location_id: row.get(1)?,
        style: row.get(2)?,
        year_built: row.get(3)?,
        architect: row.get(4)?,
        description: row.get(5)?,
        properties: properties_str.and_then(|s| serde_json::from_str(&s).ok()),
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub(crate) fn event_from_row(row: &Row) -> rusqlite::Result<HistoricalEvent> {
    let date_str: String = row.get(2)?;
    let event_date = date_str.parse().map_err(|e: chrono::ParseError| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })?;
    let properties_str: Option<String> = row.get(5)?;
    Ok(HistoricalEvent {
        id: row.get(0)?,
        location_id: row.get(1)?,
        event_date,
        event_type: row.get(3)?,
        description: row.get(4)?,
        properties: properties_str.and_then(|s| serde_json::from_str(&s).ok()),
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub(crate) fn relationship_from_row(row: &Row) -> rusqlite::Result<Relationship> {
    let properties_str: Option<String> = row.get(6)?;
    Ok(Relationship {
        id: row.get(0)?,
        from_location_id: row.get(1)?,
        to_location_id: row.get(2)?,
        relationship_type: row.get(3)?,
        strength: row.get(4)?,
        evidence: row.get(5)?,
        properties: properties_str.and_then(|s| serde_json::from_str(&s).ok()),
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn require_location(conn: &Connection, id: i64) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM locations WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(Error::not_found("location", id))
    }
}

fn validate_coordinates(lat: f64, lon: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(Error::invalid(format!("latitude out of range: {lat}")));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(Error::invalid(format!("longitude out of range: {lon}")));
    }
    Ok(())
}

fn validate_embedding(embedding: Option<&[f32]>) -> Result<()> {
    if let Some(e) = embedding {
        if e.len() != EMBEDDING_DIM {
            return Err(Error::invalid(format!(
                "embedding must have {EMBEDDING_DIM} dimensions, got {}",
                e.len()
            )));
        }
        // Cosine distance against a zero vector is undefined; such a record
        // must be stored with no embedding instead
        if e.iter().all(|&x| x == 0.0) {
            return Err(Error::invalid("embedding must have a nonzero norm"));
        }
    }
    Ok(())
}

fn properties_json(properties: Option<&serde_json::Value>) -> Result<Option<String>> {
    properties
        .map(|p| serde_json::to_string(p).map_err(|e| Error::invalid(e.to_string())))
        .transpose()
}
