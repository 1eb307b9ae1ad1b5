pub mod error;
pub mod influence;
pub mod similar;
pub mod spatial;
pub mod stats;
pub mod store;
pub mod timeline;
pub mod types;

pub use error::Error;

/// Convert an f32 embedding slice to raw bytes for sqlite-vec.
pub fn embedding_to_bytes(embedding: &[f32]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            embedding.as_ptr() as *const u8,
            embedding.len() * std::mem::size_of::<f32>(),
        )
    }
}

/// Current timestamp in RFC 3339, used for created_at/updated_at columns.
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
