//! Error taxonomy for the gazetteer query and write surface.
//!
//! Three caller-visible failure classes plus storage pass-through:
//!
//! - [`Error::NotFound`] — a referenced entity id does not exist. Traversal
//!   roots are the deliberate exception: an unknown start location yields an
//!   empty result, since an empty graph is a valid outcome while a similarity
//!   query with no query vector is not.
//! - [`Error::InvalidArgument`] — malformed depth/threshold/limit/coordinate
//!   bounds. Rejected at the boundary, never silently clamped.
//! - [`Error::MissingEmbedding`] — the similarity reference exists but carries
//!   no stored vector.
//! - [`Error::Storage`] — connectivity or query execution failure, propagated
//!   unchanged. No retry at this layer, and never a partial result.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("architectural feature {0} has no stored embedding")]
    MissingEmbedding(i64),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl Error {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
