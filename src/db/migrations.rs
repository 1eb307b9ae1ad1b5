//! Schema version tracking and upgrades.
//!
//! `schema_meta` stores the database's `schema_version`; opening a database
//! replays, in order, every step in [`STEPS`] above the stored version, so a
//! file written by any earlier release is brought up to date in one pass.
//! Downgrades are not supported: a newer file opened by an older binary is
//! left as-is.

use rusqlite::{Connection, OptionalExtension};

type Step = fn(&Connection) -> rusqlite::Result<()>;

/// Ordered upgrade steps; entry `i` moves the schema from version `i + 1` to
/// `i + 2`. Version 1 is what `init_schema` creates on a fresh database.
const STEPS: &[Step] = &[record_embedding_metadata];

/// The schema version this binary writes and expects.
pub const CURRENT_SCHEMA_VERSION: u32 = STEPS.len() as u32 + 1;

/// Read the stored schema version. An unparseable value reads as 0, which no
/// step upgrades from.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let raw: String = conn.query_row(
        "SELECT value FROM schema_meta WHERE key = 'schema_version'",
        [],
        |row| row.get(0),
    )?;
    Ok(raw.parse().unwrap_or(0))
}

/// Bring the schema up to [`CURRENT_SCHEMA_VERSION`], bumping the stored
/// version after each step.
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    let mut version = get_schema_version(conn)?;

    while version < CURRENT_SCHEMA_VERSION {
        let Some(step) = version
            .checked_sub(1)
            .and_then(|i| STEPS.get(i as usize))
        else {
            tracing::warn!(version, "no upgrade step from this schema version");
            break;
        };

        step(conn)?;
        version += 1;
        conn.execute(
            "UPDATE schema_meta SET value = ?1 WHERE key = 'schema_version'",
            [version.to_string()],
        )?;
        tracing::info!(version, "schema upgraded");
    }

    Ok(())
}

/// The embedding model the stored vectors were produced with, if recorded.
pub fn get_embedding_model(conn: &Connection) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM schema_meta WHERE key = 'embedding_model'",
        [],
        |row| row.get(0),
    )
    .optional()
}

/// Record the embedding model. Stored vectors become stale when this changes.
pub fn set_embedding_model(conn: &Connection, model: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_meta (key, value) VALUES ('embedding_model', ?1)",
        [model],
    )?;
    Ok(())
}

/// v1 → v2: stamp the embedding model and dimension into `schema_meta`, so a
/// later provider swap can tell which stored vectors need re-embedding.
fn record_embedding_metadata(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('embedding_model', 'hashed-bow-v1')",
        [],
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('embedding_dimensions', '384')",
        [],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A database with DDL applied but no upgrade steps run, i.e. what a
    /// v1-era binary would have left behind.
    fn schema_only_db() -> Connection {
        crate::db::load_sqlite_vec();
        let conn = Connection::open_in_memory().unwrap();
        crate::db::schema::init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn fresh_schema_starts_at_version_1() {
        let conn = schema_only_db();
        assert_eq!(get_schema_version(&conn).unwrap(), 1);
        assert!(get_embedding_model(&conn).unwrap().is_none());
    }

    #[test]
    fn upgrade_reaches_current_and_stamps_embedding_metadata() {
        let conn = schema_only_db();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
        assert_eq!(
            get_embedding_model(&conn).unwrap().as_deref(),
            Some("hashed-bow-v1")
        );
        let dims: String = conn
            .query_row(
                "SELECT value FROM schema_meta WHERE key = 'embedding_dimensions'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(dims, "384");
    }

    #[test]
    fn second_pass_does_not_clobber_recorded_model() {
        let conn = schema_only_db();
        run_migrations(&conn).unwrap();
        set_embedding_model(&conn, "minilm-l6-v2").unwrap();

        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
        assert_eq!(
            get_embedding_model(&conn).unwrap().as_deref(),
            Some("minilm-l6-v2")
        );
    }

    #[test]
    fn unparseable_version_is_left_alone() {
        let conn = schema_only_db();
        conn.execute(
            "UPDATE schema_meta SET value = 'garbage' WHERE key = 'schema_version'",
            [],
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), 0);
        assert!(get_embedding_model(&conn).unwrap().is_none());
    }

    #[test]
    fn embedding_model_round_trips() {
        let conn = schema_only_db();
        run_migrations(&conn).unwrap();

        set_embedding_model(&conn, "custom-model").unwrap();
        assert_eq!(
            get_embedding_model(&conn).unwrap().as_deref(),
            Some("custom-model")
        );
    }
}
