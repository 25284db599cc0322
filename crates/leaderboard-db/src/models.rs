/// Database row types. These map directly to SQLite rows and stay
/// independent of the wire types in leaderboard-types.

pub struct EntryRow {
    pub id: i64,
    pub player_name: String,
    pub score: i64,
    pub level: String,
    /// RFC 3339, UTC, fixed microsecond precision.
    pub date_completed: String,
}
