//! Sample gazetteer data for demos and smoke tests.
//!
//! Three cathedrals with features, events, and an influence chain
//! (Notre-Dame → St. Paul's → Berlin Cathedral), so every query shape has
//! something to return on a fresh database.

use anyhow::Result;
use rusqlite::{params, Connection};

use crate::embedding::EmbeddingProvider;
use crate::gazetteer::store;
use crate::gazetteer::types::{NewEvent, NewFeature, NewLocation, NewRelationship};

/// Load sample data. Idempotent: does nothing if Notre-Dame already exists.
pub fn load_sample_data(conn: &mut Connection, provider: &dyn EmbeddingProvider) -> Result<()> {
    let already_seeded: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM locations WHERE name = 'Notre-Dame Cathedral'",
        params![],
        |row| row.get(0),
    )?;
    if already_seeded {
        tracing::info!("sample data already present, skipping");
        return Ok(());
    }

    // Notre-Dame
    let notre_dame = store::create_location(
        conn,
        &NewLocation {
            name: "Notre-Dame Cathedral",
            description: Some("Medieval Catholic cathedral exemplifying French Gothic architecture."),
            location_type: "religious",
            lon: 2.3488,
            lat: 48.8529,
            properties: None,
        },
    )?;
    let notre_dame_text = "French Gothic architecture with pioneering use of the rib vault \
         and flying buttress, characterized by pointed arches, ribbed vaults, and flying \
         buttresses.";
    let embedding = provider.embed(notre_dame_text)?;
    store::create_feature(
        conn,
        &NewFeature {
            location_id: notre_dame.id,
            style: "French Gothic",
            year_built: Some(1163),
            architect: None,
            description: Some("Famous for its pioneering use of the rib vault and flying buttress."),
            embedding: Some(&embedding),
            properties: None,
        },
    )?;
    let event_text = "Construction of Notre-Dame Cathedral begins under Bishop Maurice de Sully.";
    let embedding = provider.embed(event_text)?;
    store::create_event(
        conn,
        &NewEvent {
            location_id: notre_dame.id,
            event_date: "1163-01-01".parse()?,
            event_type: "construction",
            description: "Construction begins under Bishop Maurice de Sully",
            embedding: Some(&embedding),
            properties: None,
        },
    )?;

    // St. Paul's
    let st_pauls = store::create_location(
        conn,
        &NewLocation {
            name: "St. Paul's Cathedral",
            description: Some("Anglican cathedral with significant baroque influence."),
            location_type: "religious",
            lon: -0.0983,
            lat: 51.5138,
            properties: None,
        },
    )?;
    let st_pauls_text = "English Baroque architecture with classical elements, featuring a \
         massive dome. Shows Gothic influence in its vertical emphasis.";
    let embedding = provider.embed(st_pauls_text)?;
    store::create_feature(
        conn,
        &NewFeature {
            location_id: st_pauls.id,
            style: "English Baroque",
            year_built: Some(1675),
            architect: Some("Christopher Wren"),
            description: Some("Masterpiece of English Baroque architecture with its distinctive dome."),
            embedding: Some(&embedding),
            properties: None,
        },
    )?;
    store::create_event(
        conn,
        &NewEvent {
            location_id: st_pauls.id,
            event_date: "1666-09-02".parse()?,
            event_type: "fire",
            description: "The Great Fire of London destroys the medieval cathedral on the site",
            embedding: None,
            properties: None,
        },
    )?;

    // Berlin Cathedral
    let berliner_dom = store::create_location(
        conn,
        &NewLocation {
            name: "Berlin Cathedral",
            description: Some("Protestant cathedral in Historicist style with a prominent dome."),
            location_type: "religious",
            lon: 13.4010,
            lat: 52.5192,
            properties: None,
        },
    )?;
    let dom_text = "Historicist architecture with a massive central dome and baroque \
         revival elements, vertical emphasis and classical ornament.";
    let embedding = provider.embed(dom_text)?;
    store::create_feature(
        conn,
        &NewFeature {
            location_id: berliner_dom.id,
            style: "Historicism",
            year_built: Some(1894),
            architect: Some("Julius Raschdorff"),
            description: Some("Baroque revival dome referencing earlier cathedral architecture."),
            embedding: Some(&embedding),
            properties: None,
        },
    )?;

    // Influence chain: Notre-Dame → St. Paul's → Berlin Cathedral
    store::create_relationship(
        conn,
        &NewRelationship {
            from_location_id: notre_dame.id,
            to_location_id: st_pauls.id,
            relationship_type: "influences",
            strength: Some(0.7),
            evidence: Some("Gothic architectural elements adapted in the English context."),
            properties: None,
        },
    )?;
    store::create_relationship(
        conn,
        &NewRelationship {
            from_location_id: st_pauls.id,
            to_location_id: berliner_dom.id,
            relationship_type: "influences",
            strength: Some(0.6),
            evidence: Some("Wren's dome composition echoed in the Berlin Cathedral massing."),
            properties: None,
        },
    )?;

    tracing::info!("sample data loaded");
    Ok(())
}
