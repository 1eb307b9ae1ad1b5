//! Command implementations behind the `geolens` binary.
//!
//! Each command opens the configured database, runs one query or write
//! operation, and prints the result as pretty JSON on stdout (logs go to
//! stderr).

pub mod seed;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::config::GeoLensConfig;
use crate::db;
use crate::embedding;
use crate::gazetteer::{influence, similar, spatial, stats, timeline};

/// Initialize the database schema, optionally loading sample data.
pub fn init_db(config: &GeoLensConfig, with_sample_data: bool) -> Result<()> {
    let mut conn = db::open_database(config.resolved_db_path())?;

    if with_sample_data {
        let provider = embedding::create_provider(&config.embedding)?;
        seed::load_sample_data(&mut conn, provider.as_ref())?;
    }

    db::migrations::set_embedding_model(&conn, &config.embedding.model)?;
    println!("Database initialized at {}", config.resolved_db_path().display());
    Ok(())
}

/// Locations within a radius of a point.
pub fn near(
    config: &GeoLensConfig,
    lat: f64,
    lon: f64,
    distance_meters: Option<f64>,
    limit: Option<usize>,
) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;
    let results = spatial::find_locations_near(
        &conn,
        lat,
        lon,
        distance_meters.unwrap_or(config.query.near_distance_meters),
        limit.unwrap_or(config.query.near_limit),
    )?;
    print_json(&results)
}

/// Features architecturally similar to a reference feature.
pub fn similar(
    config: &GeoLensConfig,
    feature_id: i64,
    threshold: Option<f64>,
    limit: Option<usize>,
) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;
    let results = similar::find_similar_features(
        &conn,
        feature_id,
        threshold.unwrap_or(config.query.similarity_threshold),
        limit.unwrap_or(config.query.similarity_limit),
    )?;
    print_json(&results)
}

/// A location's historical events, optionally date-bounded.
pub fn timeline(
    config: &GeoLensConfig,
    location_id: i64,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;
    let results = timeline::find_historical_timeline(&conn, location_id, start_date, end_date)?;
    print_json(&results)
}

/// Influence chains rooted at a location.
pub fn influences(config: &GeoLensConfig, location_id: i64, max_depth: Option<u32>) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;
    let results = influence::find_influences(
        &conn,
        location_id,
        max_depth.unwrap_or(config.query.max_influence_depth),
    )?;
    print_json(&results)
}

/// Store statistics.
pub fn stats(config: &GeoLensConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    let response = stats::gazetteer_stats(&conn, Some(&db_path))?;
    print_json(&response)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize results")?;
    println!("{json}");
    Ok(())
}
