//! Architectural-influence chain traversal.
//!
//! Enumerates every directed chain of `"influences"` edges reachable from a
//! start location, up to a caller-supplied depth bound, aggregating edge
//! strength multiplicatively and refusing to revisit a location already on the
//! current path. Each hop is reported with the names of that hop's edge
//! endpoints, so a chain A→B→C yields two entries: (A, B, depth 1) and
//! (B, C, depth 2).
//!
//! Expressed as an explicit breadth-first loop over an adjacency map loaded
//! from a single snapshot of the edge table. Termination is guaranteed twice
//! over: the per-path visited set shrinks the reachable frontier every hop,
//! and `max_depth` caps the iteration count on any graph.

use rusqlite::{params, Connection};
use serde::Serialize;
use std::collections::HashMap;

use crate::gazetteer::error::{Error, Result};

/// The edge label the traversal follows. No other relationship type is ever
/// expanded.
const INFLUENCES: &str = "influences";

/// One hop of an influence chain.
#[derive(Debug, Clone, Serialize)]
pub struct InfluenceLink {
    pub from_location_id: i64,
    pub to_location_id: i64,
    /// Name of the traversed edge's source location.
    pub from_location: String,
    /// Name of the traversed edge's target location.
    pub to_location: String,
    /// Hop count from the start location, 1-based.
    pub depth: u32,
    /// Product of edge strengths along the chain up to and including this hop.
    pub influence_strength: f64,
}

/// A directed weighted edge in the adjacency map.
struct Edge {
    to: i64,
    strength: f64,
}

/// A candidate chain in the BFS frontier.
struct PathState {
    /// Every location on the chain so far, start included. Doubles as the
    /// cycle guard: an edge may not lead back to any of these.
    path: Vec<i64>,
    end: i64,
    accumulated_strength: f64,
}

/// Find all influence chains rooted at `start_location_id`, up to `max_depth`
/// hops.
///
/// An unknown start location (or one with no outgoing `"influences"` edges)
/// yields an empty result, not an error. Edges with a null strength are
/// excluded: a missing weight must not silently break the multiplication
/// chain. `max_depth == 0` is rejected.
///
/// Results are ordered by depth ascending, then accumulated strength
/// descending, with `(from_location_id, to_location_id)` ascending as the
/// deterministic tie-break.
pub fn find_influences(
    conn: &Connection,
    start_location_id: i64,
    max_depth: u32,
) -> Result<Vec<InfluenceLink>> {
    if max_depth == 0 {
        return Err(Error::invalid("max_depth must be at least 1"));
    }

    let adjacency = load_adjacency(conn)?;

    let mut frontier = vec![PathState {
        path: vec![start_location_id],
        end: start_location_id,
        accumulated_strength: 1.0,
    }];
    // (from, to, depth, strength) in discovery order; names resolved after.
    let mut hops: Vec<(i64, i64, u32, f64)> = Vec::new();

    for depth in 1..=max_depth {
        let mut next_frontier = Vec::new();

        for state in &frontier {
            let Some(edges) = adjacency.get(&state.end) else {
                continue;
            };
            for edge in edges {
                // Cycle guard: never revisit a location already on this path
                if state.path.contains(&edge.to) {
                    continue;
                }
                let strength = state.accumulated_strength * edge.strength;
                hops.push((state.end, edge.to, depth, strength));

                let mut path = state.path.clone();
                path.push(edge.to);
                next_frontier.push(PathState {
                    path,
                    end: edge.to,
                    accumulated_strength: strength,
                });
            }
        }

        if next_frontier.is_empty() {
            break;
        }
        frontier = next_frontier;
    }

    let names = fetch_location_names(conn, &hops)?;

    let mut links: Vec<InfluenceLink> = hops
        .into_iter()
        .map(|(from, to, depth, strength)| InfluenceLink {
            from_location_id: from,
            to_location_id: to,
            from_location: names.get(&from).cloned().unwrap_or_default(),
            to_location: names.get(&to).cloned().unwrap_or_default(),
            depth,
            influence_strength: strength,
        })
        .collect();

    links.sort_by(|a, b| {
        a.depth
            .cmp(&b.depth)
            .then(
                b.influence_strength
                    .partial_cmp(&a.influence_strength)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
            .then(a.from_location_id.cmp(&b.from_location_id))
            .then(a.to_location_id.cmp(&b.to_location_id))
    });

    tracing::debug!(
        start = start_location_id,
        max_depth,
        links = links.len(),
        "influence traversal complete"
    );
    Ok(links)
}

/// Load every traversable edge into an adjacency map, in one snapshot read.
///
/// Only `"influences"` edges with a non-null strength participate; self-loops
/// are skipped even if the write path let one in.
fn load_adjacency(conn: &Connection) -> Result<HashMap<i64, Vec<Edge>>> {
    let mut stmt = conn.prepare(
        "SELECT from_location_id, to_location_id, strength FROM relationships \
         WHERE relationship_type = ?1 AND strength IS NOT NULL \
         AND from_location_id != to_location_id \
         ORDER BY from_location_id, to_location_id",
    )?;

    let mut adjacency: HashMap<i64, Vec<Edge>> = HashMap::new();
    let rows = stmt.query_map(params![INFLUENCES], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, f64>(2)?,
        ))
    })?;
    for row in rows {
        let (from, to, strength) = row?;
        adjacency
            .entry(from)
            .or_default()
            .push(Edge { to, strength });
    }
    Ok(adjacency)
}

/// Batch-fetch names for every location id appearing in the emitted hops.
fn fetch_location_names(
    conn: &Connection,
    hops: &[(i64, i64, u32, f64)],
) -> Result<HashMap<i64, String>> {
    let mut ids: Vec<i64> = hops.iter().flat_map(|&(f, t, _, _)| [f, t]).collect();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "SELECT id, name FROM locations WHERE id IN ({})",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::types::ToSql> =
        ids.iter().map(|id| id as &dyn rusqlite::types::ToSql).collect();

    let mut names = HashMap::new();
    let rows = stmt.query_map(params.as_slice(), |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;
    for row in rows {
        let (id, name) = row?;
        names.insert(id, name);
    }
    Ok(names)
}
