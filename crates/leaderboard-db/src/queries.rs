use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use leaderboard_types::validation::NewEntry;
use rusqlite::{Connection, Row};

use crate::Database;
use crate::models::EntryRow;

const ENTRY_COLUMNS: &str = "id, player_name, score, level, date_completed";

/// Ranking order shared by the list and top-N queries. `id` only settles
/// rows completed in the same microsecond.
const RANK_ORDER: &str = "ORDER BY score DESC, date_completed ASC, id ASC";

/// Fixed-width text form so that lexical order in SQLite equals time order.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Case-folded form of a player name used for lookups.
pub fn player_key(name: &str) -> String {
    name.to_lowercase()
}

impl Database {
    /// One page of the ranked leaderboard.
    pub fn list_entries(&self, offset: i64, limit: i64) -> Result<Vec<EntryRow>> {
        if limit <= 0 {
            return Ok(vec![]);
        }
        self.with_conn(|conn| query_ranked(conn, offset.max(0), limit))
    }

    /// Best `count` entries. SQLite treats a negative LIMIT as unbounded,
    /// so non-positive counts short-circuit here.
    pub fn top_entries(&self, count: i64) -> Result<Vec<EntryRow>> {
        if count <= 0 {
            return Ok(vec![]);
        }
        self.with_conn(|conn| query_ranked(conn, 0, count))
    }

    pub fn get_entry(&self, id: i64) -> Result<Option<EntryRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM leaderboard_entries WHERE id = ?1", ENTRY_COLUMNS);
            conn.query_row(&sql, [id], map_entry).optional()
        })
    }

    /// Every entry for a player, matched case-insensitively, best score first.
    /// Tied scores come back in store order.
    pub fn get_entries_for_player(&self, player_name: &str) -> Result<Vec<EntryRow>> {
        let key = player_key(player_name);
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM leaderboard_entries WHERE player_key = ?1 ORDER BY score DESC",
                ENTRY_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([&key], map_entry)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Insert a validated entry and return the stored row, id included.
    /// Single statement, so either the whole row lands or nothing does.
    pub fn insert_entry(&self, entry: &NewEntry, completed_at: DateTime<Utc>) -> Result<EntryRow> {
        let key = player_key(&entry.player_name);
        let completed_at = format_timestamp(completed_at);

        self.with_conn_mut(|conn| {
            let sql = format!(
                "INSERT INTO leaderboard_entries (player_name, player_key, score, level, date_completed)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {}",
                ENTRY_COLUMNS
            );
            let row = conn.query_row(
                &sql,
                rusqlite::params![entry.player_name, key, entry.score, entry.level, completed_at],
                map_entry,
            )?;
            Ok(row)
        })
    }

    /// Returns false when no entry had this id.
    pub fn delete_entry(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let affected = conn.execute("DELETE FROM leaderboard_entries WHERE id = ?1", [id])?;
            Ok(affected > 0)
        })
    }

    pub fn count_entries(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM leaderboard_entries", [], |r| r.get(0))?;
            Ok(count)
        })
    }
}

fn query_ranked(conn: &Connection, offset: i64, limit: i64) -> Result<Vec<EntryRow>> {
    let sql = format!(
        "SELECT {} FROM leaderboard_entries {} LIMIT ?1 OFFSET ?2",
        ENTRY_COLUMNS, RANK_ORDER
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([limit, offset], map_entry)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn map_entry(row: &Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok(EntryRow {
        id: row.get(0)?,
        player_name: row.get(1)?,
        score: row.get(2)?,
        level: row.get(3)?,
        date_completed: row.get(4)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
