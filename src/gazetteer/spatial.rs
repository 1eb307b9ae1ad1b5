//! Geodesic proximity query.
//!
//! SQLite has no native geography type, so the radius test runs in two stages:
//! a cheap bounding-box prefilter over the indexed `(lat, lon)` columns, then
//! an exact haversine distance check on the survivors. The longitude band
//! wraps across the antimeridian rather than clamping, so a query near
//! ±180° still sees candidates on the far side. Results are ordered by
//! ascending distance with ascending id as the tie-break — an arbitrary order
//! is not test-reproducible.

use rusqlite::Connection;
use serde::Serialize;

use crate::gazetteer::error::{Error, Result};
use crate::gazetteer::store::location_from_row;
use crate::gazetteer::types::Location;

/// WGS84 mean earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A location with its geodesic distance from the query point.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyLocation {
    pub location: Location,
    pub distance_meters: f64,
}

/// Find locations within `distance_meters` of `(lat, lon)` (inclusive),
/// nearest first, truncated to `limit`.
///
/// A negative radius yields an empty result, not an error; a zero radius
/// matches only coincident points. Coordinates outside WGS84 bounds are
/// rejected.
pub fn find_locations_near(
    conn: &Connection,
    lat: f64,
    lon: f64,
    distance_meters: f64,
    limit: usize,
) -> Result<Vec<NearbyLocation>> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(Error::invalid(format!("latitude out of range: {lat}")));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(Error::invalid(format!("longitude out of range: {lon}")));
    }
    if distance_meters < 0.0 {
        return Ok(Vec::new());
    }

    let lat_delta = (distance_meters / EARTH_RADIUS_M).to_degrees();
    let lat_min = (lat - lat_delta).max(-90.0);
    let lat_max = (lat + lat_delta).min(90.0);

    let mut sql = String::from(
        "SELECT id, name, description, location_type, lon, lat, properties, created_at, updated_at \
         FROM locations WHERE lat BETWEEN ?1 AND ?2",
    );
    let mut params: Vec<f64> = vec![lat_min, lat_max];
    match lon_band(lat, lon, distance_meters) {
        LonBand::Full => {}
        LonBand::Contiguous(min, max) => {
            sql.push_str(" AND lon BETWEEN ?3 AND ?4");
            params.extend([min, max]);
        }
        LonBand::Wrapped(min, max) => {
            sql.push_str(" AND (lon >= ?3 OR lon <= ?4)");
            params.extend([min, max]);
        }
    }

    let mut stmt = conn.prepare(&sql)?;
    let candidates: Vec<Location> = stmt
        .query_map(rusqlite::params_from_iter(params), location_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut nearby: Vec<NearbyLocation> = candidates
        .into_iter()
        .map(|location| {
            let distance_meters = haversine_meters(lat, lon, location.lat, location.lon);
            NearbyLocation {
                location,
                distance_meters,
            }
        })
        .filter(|n| n.distance_meters <= distance_meters)
        .collect();

    nearby.sort_by(|a, b| {
        a.distance_meters
            .partial_cmp(&b.distance_meters)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.location.id.cmp(&b.location.id))
    });
    nearby.truncate(limit);

    Ok(nearby)
}

/// Great-circle distance between two WGS84 points, in meters.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Longitude prefilter band guaranteed to contain every point within the
/// radius. Over-approximates; the haversine pass removes false positives.
enum LonBand {
    /// The whole [-180, 180] range (polar query, or a radius wide enough to
    /// span every meridian).
    Full,
    Contiguous(f64, f64),
    /// Crosses the antimeridian: matches `lon >= .0 OR lon <= .1`.
    Wrapped(f64, f64),
}

fn lon_band(lat: f64, lon: f64, radius: f64) -> LonBand {
    let cos_lat = lat.to_radians().cos();
    // Near the poles a fixed longitude band is meaningless
    if cos_lat < 1e-6 {
        return LonBand::Full;
    }

    let lon_delta = (radius / (EARTH_RADIUS_M * cos_lat)).to_degrees();
    if lon_delta >= 180.0 {
        return LonBand::Full;
    }

    let min = lon - lon_delta;
    let max = lon + lon_delta;
    if min < -180.0 {
        LonBand::Wrapped(min + 360.0, max)
    } else if max > 180.0 {
        LonBand::Wrapped(min, max - 360.0)
    } else {
        LonBand::Contiguous(min, max)
    }
}
