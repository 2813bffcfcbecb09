//! Draft slot repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Store opaque serialized draft envelopes under string keys.
//!
//! # Invariants
//! - A key holds at most one payload; writes replace it.
//! - Payloads are stored verbatim; decoding belongs to the draft service.

use super::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Key of the single post draft slot.
pub const POST_DRAFT_KEY: &str = "postDraft";

/// Key/value storage for draft envelopes.
pub trait DraftSlotRepository {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>>;
    fn write_slot(&self, key: &str, payload: &str) -> RepoResult<()>;
    /// Removes `key`; returns whether a payload existed.
    fn delete_slot(&self, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed draft slots in table `draft_slots`.
pub struct SqliteDraftSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDraftSlotRepository<'conn> {
    /// Creates a repository after checking the `draft_slots` schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_draft_schema(conn)?;
        Ok(Self { conn })
    }
}

impl DraftSlotRepository for SqliteDraftSlotRepository<'_> {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM draft_slots WHERE slot_key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write_slot(&self, key: &str, payload: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO draft_slots (slot_key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(slot_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![key, payload],
        )?;
        Ok(())
    }

    fn delete_slot(&self, key: &str) -> RepoResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM draft_slots WHERE slot_key = ?1;", [key])?;
        Ok(removed > 0)
    }
}

fn ensure_draft_schema(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "draft_slots")? {
        return Err(RepoError::MissingRequiredTable("draft_slots"));
    }
    for column in ["slot_key", "payload", "updated_at"] {
        if !table_has_column(conn, "draft_slots", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "draft_slots",
                column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
