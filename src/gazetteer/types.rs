//! Core gazetteer record definitions.
//!
//! Defines [`Location`], [`ArchitecturalFeature`], [`HistoricalEvent`], and
//! [`Relationship`], matching the table schemas, plus the `New*` input structs
//! used by the write path. Ids are SQLite's monotonically-assigned integers;
//! property maps are open-ended JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A point of interest with WGS84 coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    /// Display name, not unique.
    pub name: String,
    pub description: Option<String>,
    /// Free-form category tag (e.g. `"religious"`, `"civic"`).
    pub location_type: String,
    /// Longitude in degrees, WGS84.
    pub lon: f64,
    /// Latitude in degrees, WGS84.
    pub lat: f64,
    /// Open-ended key-value properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 last-modification timestamp, refreshed on update.
    pub updated_at: String,
}

/// An architectural attribute of a location. The descriptive text may carry a
/// 384-dimension embedding stored in `features_vec`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchitecturalFeature {
    pub id: i64,
    pub location_id: i64,
    /// Style tag (e.g. `"French Gothic"`).
    pub style: String,
    pub year_built: Option<i32>,
    pub architect: Option<String>,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
    pub created_at: String,
    pub updated_at: String,
}

/// A dated event at a location. The description may carry a 384-dimension
/// embedding stored in `events_vec`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalEvent {
    pub id: i64,
    pub location_id: i64,
    pub event_date: NaiveDate,
    /// Event category tag (e.g. `"construction"`, `"fire"`).
    pub event_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
    pub created_at: String,
    pub updated_at: String,
}

/// A directed edge between two locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub id: i64,
    pub from_location_id: i64,
    pub to_location_id: i64,
    /// Edge label (e.g. `"influences"` — the only label the traversal follows).
    pub relationship_type: String,
    /// Unitless weight, intended range [0, 1]. Edges with no strength are
    /// excluded from influence traversal.
    pub strength: Option<f64>,
    pub evidence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a location.
#[derive(Debug, Clone)]
pub struct NewLocation<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub location_type: &'a str,
    pub lon: f64,
    pub lat: f64,
    pub properties: Option<&'a serde_json::Value>,
}

/// Input for creating an architectural feature. `embedding`, when present,
/// must be exactly 384 floats.
#[derive(Debug, Clone)]
pub struct NewFeature<'a> {
    pub location_id: i64,
    pub style: &'a str,
    pub year_built: Option<i32>,
    pub architect: Option<&'a str>,
    pub description: Option<&'a str>,
    pub embedding: Option<&'a [f32]>,
    pub properties: Option<&'a serde_json::Value>,
}

/// Input for creating a historical event.
#[derive(Debug, Clone)]
pub struct NewEvent<'a> {
    pub location_id: i64,
    pub event_date: NaiveDate,
    pub event_type: &'a str,
    pub description: &'a str,
    pub embedding: Option<&'a [f32]>,
    pub properties: Option<&'a serde_json::Value>,
}

/// Input for creating a relationship edge.
#[derive(Debug, Clone)]
pub struct NewRelationship<'a> {
    pub from_location_id: i64,
    pub to_location_id: i64,
    pub relationship_type: &'a str,
    pub strength: Option<f64>,
    pub evidence: Option<&'a str>,
    pub properties: Option<&'a serde_json::Value>,
}

/// Field updates for a location. `None` leaves the field unchanged; there is
/// no way to clear an optional field back to NULL through an update — delete
/// and recreate the location instead.
#[derive(Debug, Clone, Default)]
pub struct LocationUpdate<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub location_type: Option<&'a str>,
    pub point: Option<(f64, f64)>,
    pub properties: Option<&'a serde_json::Value>,
}
