use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Bring the schema up to date. Safe to call on every startup.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (leaderboard_entries)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE leaderboard_entries (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                player_name     TEXT NOT NULL CHECK (length(player_name) <= 100),
                player_key      TEXT NOT NULL,
                score           INTEGER NOT NULL CHECK (score >= 0),
                level           TEXT NOT NULL CHECK (length(level) <= 50),
                date_completed  TEXT NOT NULL
            );

            CREATE INDEX idx_entries_score
                ON leaderboard_entries(score DESC, date_completed ASC);

            CREATE INDEX idx_entries_date_completed
                ON leaderboard_entries(date_completed);

            CREATE INDEX idx_entries_player
                ON leaderboard_entries(player_key, score DESC);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rerunning_is_a_noop() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn ranking_indexes_exist() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();

        let mut stmt = conn
            .prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'index' AND tbl_name = 'leaderboard_entries'
                 ORDER BY name",
            )
            .unwrap();
        let names: Vec<String> = stmt
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            names,
            vec![
                "idx_entries_date_completed",
                "idx_entries_player",
                "idx_entries_score",
            ]
        );
    }

    #[test]
    fn store_rejects_negative_score() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO leaderboard_entries (player_name, player_key, score, level, date_completed)
             VALUES ('a', 'a', -1, 'L1', '2024-01-01T00:00:00.000000Z')",
            [],
        );
        assert!(result.is_err());
    }
}
