//! Cross-module flows: writes observed through every query shape, and the
//! effect of deletions on later query results.

mod helpers;

use geolens::gazetteer::types::NewEvent;
use geolens::gazetteer::{influence, similar, spatial, store, Error};

#[test]
fn deleted_location_disappears_from_proximity_results() {
    let mut conn = helpers::test_db();
    let paris = helpers::insert_location(&conn, "Paris", 2.3488, 48.8529);
    helpers::insert_location(&conn, "Versailles", 2.1204, 48.8049);

    let before = spatial::find_locations_near(&conn, 48.8529, 2.3488, 50_000.0, 10).unwrap();
    assert_eq!(before.len(), 2);

    store::delete_location(&mut conn, paris).unwrap();

    let after = spatial::find_locations_near(&conn, 48.8529, 2.3488, 50_000.0, 10).unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].location.name, "Versailles");
}

#[test]
fn deleting_a_chain_link_severs_the_traversal() {
    let mut conn = helpers::test_db();
    let a = helpers::insert_location(&conn, "A", 0.0, 0.0);
    let b = helpers::insert_location(&conn, "B", 1.0, 1.0);
    let c = helpers::insert_location(&conn, "C", 2.0, 2.0);
    helpers::insert_influence(&conn, a, b, 0.7);
    helpers::insert_influence(&conn, b, c, 0.8);

    assert_eq!(influence::find_influences(&conn, a, 3).unwrap().len(), 2);

    // Deleting B cascades to both edges touching it
    store::delete_location(&mut conn, b).unwrap();

    let links = influence::find_influences(&conn, a, 3).unwrap();
    assert!(links.is_empty());
}

#[test]
fn deleted_feature_vector_leaves_the_similarity_index() {
    let mut conn = helpers::test_db();
    let loc = helpers::insert_location(&conn, "L", 0.0, 0.0);
    let reference =
        helpers::insert_feature(&mut conn, loc, "reference", Some(&helpers::test_embedding(0)));
    let twin = helpers::insert_feature(&mut conn, loc, "twin", Some(&helpers::test_embedding(0)));

    let before = similar::find_similar_features(&conn, reference, 0.5, 10).unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].feature.id, twin);

    store::delete_feature(&mut conn, twin).unwrap();

    let after = similar::find_similar_features(&conn, reference, 0.5, 10).unwrap();
    assert!(after.is_empty());
}

#[test]
fn deleting_the_reference_makes_similarity_not_found() {
    let mut conn = helpers::test_db();
    let loc = helpers::insert_location(&conn, "L", 0.0, 0.0);
    let reference =
        helpers::insert_feature(&mut conn, loc, "reference", Some(&helpers::test_embedding(0)));

    store::delete_feature(&mut conn, reference).unwrap();

    let result = similar::find_similar_features(&conn, reference, 0.5, 10);
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

#[test]
fn cascade_delete_removes_the_timeline() {
    let mut conn = helpers::test_db();
    let loc = helpers::insert_location(&conn, "L", 0.0, 0.0);
    store::create_event(
        &mut conn,
        &NewEvent {
            location_id: loc,
            event_date: "1666-09-02".parse().unwrap(),
            event_type: "fire",
            description: "the great fire",
            embedding: None,
            properties: None,
        },
    )
    .unwrap();

    store::delete_location(&mut conn, loc).unwrap();

    let events =
        geolens::gazetteer::timeline::find_historical_timeline(&conn, loc, None, None).unwrap();
    assert!(events.is_empty());
}

#[test]
fn similarity_candidates_span_locations() {
    // The similarity query ranks features globally, not per location
    let mut conn = helpers::test_db();
    let paris = helpers::insert_location(&conn, "Paris", 2.3488, 48.8529);
    let london = helpers::insert_location(&conn, "London", -0.0983, 51.5138);
    let reference =
        helpers::insert_feature(&mut conn, paris, "Gothic", Some(&helpers::test_embedding(0)));
    let foreign = helpers::insert_feature(
        &mut conn,
        london,
        "Gothic Revival",
        Some(&helpers::embedding_at_similarity(0.9)),
    );

    let results = similar::find_similar_features(&conn, reference, 0.5, 10).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].feature.id, foreign);
    assert_eq!(results[0].feature.location_id, london);
}

#[test]
fn influence_traversal_ignores_removed_edges() {
    let conn = helpers::test_db();
    let a = helpers::insert_location(&conn, "A", 0.0, 0.0);
    let b = helpers::insert_location(&conn, "B", 1.0, 1.0);
    let edge = helpers::insert_influence(&conn, a, b, 0.7);

    assert_eq!(influence::find_influences(&conn, a, 2).unwrap().len(), 1);

    store::delete_relationship(&conn, edge).unwrap();

    assert!(influence::find_influences(&conn, a, 2).unwrap().is_empty());
}
