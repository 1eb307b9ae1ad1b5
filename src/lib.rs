//! Spatial-historical gazetteer over SQLite.
//!
//! GeoLens stores locations (points of interest), their architectural and
//! historical attributes (each with an optional 384-dimension text embedding),
//! and directed relationship edges between locations. On top of that data it
//! answers four query shapes:
//!
//! - **proximity** — locations within a geodesic radius of a point
//! - **similarity** — architectural features ranked by embedding distance
//! - **timeline** — a location's historical events in a date window
//! - **influence chains** — bounded-depth traversal of weighted
//!   `"influences"` edges with cycle prevention and multiplicative strength
//!
//! # Architecture
//!
//! - **Storage**: SQLite with [sqlite-vec](https://github.com/asg017/sqlite-vec)
//!   for cosine-distance vector search
//! - **Embeddings**: pluggable [`embedding::EmbeddingProvider`] (384 dimensions,
//!   L2-normalized); the query layer only consumes already-stored vectors
//! - **Queries**: read-only, side-effect-free computations — safe to run
//!   concurrently, each against a single connection snapshot
//!
//! # Modules
//!
//! - [`cli`] — Command implementations behind the `geolens` binary
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — Database initialization, schema, and migrations
//! - [`embedding`] — Text-to-vector embedding seam
//! - [`gazetteer`] — Core engine: write path, proximity, similarity, timeline,
//!   and influence traversal

pub mod cli;
pub mod config;
pub mod db;
pub mod embedding;
pub mod gazetteer;
