//! Embedding-similarity ranking over architectural features.
//!
//! The reference feature's stored vector is the query; every other feature
//! carrying an embedding is scored by normalized cosine similarity
//! `1 − cosine_distance`, filtered by a strict threshold, and ranked
//! descending. The KNN work is delegated to the sqlite-vec index (cosine
//! metric); this module owns only the scoring/filtering/ordering contract, so
//! any storage engine with a vector-distance primitive could back it.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::gazetteer::error::{Error, Result};
use crate::gazetteer::store::feature_from_row;
use crate::gazetteer::types::ArchitecturalFeature;

/// A similarity-ranked candidate.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarFeature {
    pub feature: ArchitecturalFeature,
    /// `1 − cosine_distance` against the reference embedding; in [-1, 1],
    /// and [0, 1] for the non-negative embeddings this crate stores.
    pub similarity: f64,
}

/// Find features architecturally similar to `feature_id`.
///
/// The reference must exist and carry an embedding: a missing feature is
/// `NotFound`, a feature without a stored vector is `MissingEmbedding` —
/// unlike traversal roots, a similarity query with no query vector is not a
/// valid empty outcome. Thresholds outside `[0, 1]` and a zero limit are
/// rejected rather than clamped.
///
/// The reference never appears in its own results. Candidates scoring
/// `<= threshold` are discarded (strict). Results are sorted descending by
/// similarity with ascending feature id as the deterministic tie-break, then
/// truncated to `limit`.
pub fn find_similar_features(
    conn: &Connection,
    feature_id: i64,
    similarity_threshold: f64,
    limit: usize,
) -> Result<Vec<SimilarFeature>> {
    if !(0.0..=1.0).contains(&similarity_threshold) {
        return Err(Error::invalid(format!(
            "similarity_threshold must be in [0, 1], got {similarity_threshold}"
        )));
    }
    if limit == 0 {
        return Err(Error::invalid("limit must be at least 1"));
    }

    let reference = load_reference_embedding(conn, feature_id)?;

    // KNN over the cosine-metric index; distance ascends, so similarity
    // descends. Fetch one extra row since the reference is its own nearest
    // neighbor.
    let k = (limit + 1) as i64;
    let mut stmt = conn.prepare(
        "SELECT id, distance FROM features_vec \
         WHERE embedding MATCH ?1 ORDER BY distance LIMIT ?2",
    )?;
    let candidates: Vec<(i64, f64)> = stmt
        .query_map(params![reference, k], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut scored: Vec<(i64, f64)> = candidates
        .into_iter()
        .filter(|&(id, _)| id != feature_id)
        .map(|(id, distance)| (id, 1.0 - distance))
        .filter(|&(_, similarity)| similarity > similarity_threshold)
        .collect();

    // KNN already orders by distance, but make the tie-break explicit
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    scored.truncate(limit);

    let mut results = Vec::with_capacity(scored.len());
    for (id, similarity) in scored {
        let feature = conn.query_row(
            "SELECT id, location_id, style, year_built, architect, description, properties, created_at, updated_at \
             FROM architectural_features WHERE id = ?1",
            params![id],
            feature_from_row,
        )?;
        results.push(SimilarFeature {
            feature,
            similarity,
        });
    }

    tracing::debug!(
        feature_id,
        threshold = similarity_threshold,
        matches = results.len(),
        "similarity search complete"
    );
    Ok(results)
}

/// Fetch the reference feature's stored embedding, distinguishing a missing
/// feature from a feature that was stored without a vector.
fn load_reference_embedding(conn: &Connection, feature_id: i64) -> Result<Vec<u8>> {
    let embedding: Option<Vec<u8>> = conn
        .query_row(
            "SELECT embedding FROM features_vec WHERE id = ?1",
            params![feature_id],
            |row| row.get(0),
        )
        .optional()?;

    match embedding {
        Some(bytes) => Ok(bytes),
        None => {
            let exists: bool = conn.query_row(
                "SELECT COUNT(*) > 0 FROM architectural_features WHERE id = ?1",
                params![feature_id],
                |row| row.get(0),
            )?;
            if exists {
                Err(Error::MissingEmbedding(feature_id))
            } else {
                Err(Error::not_found("architectural feature", feature_id))
            }
        }
    }
}
