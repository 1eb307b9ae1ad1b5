#![allow(dead_code)]

use geolens::db;
use geolens::gazetteer::store;
use geolens::gazetteer::types::{NewFeature, NewLocation, NewRelationship};
use rusqlite::Connection;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// Generate a deterministic 384-dim embedding with a spike at position `seed`.
/// Each seed produces a distinct, orthogonal vector.
pub fn test_embedding(seed: u8) -> Vec<f32> {
    let mut v = vec![0.0f32; 384];
    v[seed as usize % 384] = 1.0;
    v
}

/// Unit vector with cosine similarity `cos` against `test_embedding(0)`.
pub fn embedding_at_similarity(cos: f32) -> Vec<f32> {
    let mut v = vec![0.0f32; 384];
    v[0] = cos;
    v[1] = (1.0 - cos * cos).sqrt();
    v
}

/// Insert a test location at the given coordinates. Returns the location id.
pub fn insert_location(conn: &Connection, name: &str, lon: f64, lat: f64) -> i64 {
    store::create_location(
        conn,
        &NewLocation {
            name,
            description: None,
            location_type: "test",
            lon,
            lat,
            properties: None,
        },
    )
    .unwrap()
    .id
}

/// Insert an architectural feature with an optional embedding. Returns the
/// feature id.
pub fn insert_feature(
    conn: &mut Connection,
    location_id: i64,
    style: &str,
    embedding: Option<&[f32]>,
) -> i64 {
    store::create_feature(
        conn,
        &NewFeature {
            location_id,
            style,
            year_built: None,
            architect: None,
            description: None,
            embedding,
            properties: None,
        },
    )
    .unwrap()
    .id
}

/// Insert an "influences" edge with the given strength. Returns the edge id.
pub fn insert_influence(conn: &Connection, from: i64, to: i64, strength: f64) -> i64 {
    store::create_relationship(
        conn,
        &NewRelationship {
            from_location_id: from,
            to_location_id: to,
            relationship_type: "influences",
            strength: Some(strength),
            evidence: None,
            properties: None,
        },
    )
    .unwrap()
    .id
}
