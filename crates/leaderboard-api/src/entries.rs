use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use tracing::info;

use leaderboard_db::Database;
use leaderboard_db::models::EntryRow;
use leaderboard_types::api::{CreateEntryRequest, DEFAULT_TOP_COUNT, ListQuery, ProblemDetails};
use leaderboard_types::models::LeaderboardEntry;

use crate::error::ApiError;
use crate::state::AppState;

pub const ENTRIES_PATH: &str = "/api/leaderboard";

/// GET /api/leaderboard — one page of the ranked leaderboard.
#[utoipa::path(
    get,
    path = "/api/leaderboard",
    tag = "leaderboard",
    params(ListQuery),
    responses(
        (status = 200, description = "Entries by score, earlier completion first on ties", body = [LeaderboardEntry]),
        (status = 400, description = "Non-numeric paging values", body = ProblemDetails)
    )
)]
pub async fn list_entries(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let Query(query) = query?;
    let offset = query.offset();
    let limit = query.page_size();

    let rows = run_blocking(&state, move |db| db.list_entries(offset, limit)).await?;
    Ok(Json(to_entries(rows)?))
}

/// GET /api/leaderboard/{id}
#[utoipa::path(
    get,
    path = "/api/leaderboard/{id}",
    tag = "leaderboard",
    params(("id" = i64, Path, description = "Entry id")),
    responses(
        (status = 200, description = "The entry", body = LeaderboardEntry),
        (status = 404, description = "No entry with this id")
    )
)]
pub async fn get_entry(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<LeaderboardEntry>, ApiError> {
    let Path(id) = id?;

    let row = run_blocking(&state, move |db| db.get_entry(id))
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(to_entry(row)?))
}

/// POST /api/leaderboard — validates, stamps the completion time and stores
/// a new entry. Responds 201 with the stored entry and its location.
#[utoipa::path(
    post,
    path = "/api/leaderboard",
    tag = "leaderboard",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry created", body = LeaderboardEntry,
            headers(("Location" = String, description = "URL of the new entry"))),
        (status = 400, description = "One or more fields are invalid", body = ProblemDetails)
    )
)]
pub async fn create_entry(
    State(state): State<AppState>,
    payload: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let new_entry = req.validate()?;
    let now = Utc::now();

    let row = run_blocking(&state, move |db| db.insert_entry(&new_entry, now)).await?;
    let entry = to_entry(row)?;

    info!(
        "Entry {} created: {} scored {} on {}",
        entry.id, entry.player_name, entry.score, entry.level
    );

    let location = format!("{}/{}", ENTRIES_PATH, entry.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(entry)))
}

/// DELETE /api/leaderboard/{id}
#[utoipa::path(
    delete,
    path = "/api/leaderboard/{id}",
    tag = "leaderboard",
    params(("id" = i64, Path, description = "Entry id")),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 404, description = "No entry with this id")
    )
)]
pub async fn delete_entry(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;

    let deleted = run_blocking(&state, move |db| db.delete_entry(id)).await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!("Entry {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/leaderboard/top/{count}
#[utoipa::path(
    get,
    path = "/api/leaderboard/top/{count}",
    tag = "leaderboard",
    params(("count" = i64, Path, description = "Maximum number of entries; zero or less yields none")),
    responses(
        (status = 200, description = "Best entries, earlier completion first on ties", body = [LeaderboardEntry])
    )
)]
pub async fn top_scores(
    State(state): State<AppState>,
    count: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let Path(count) = count?;
    fetch_top(&state, count).await
}

/// GET /api/leaderboard/top — the ten best entries.
#[utoipa::path(
    get,
    path = "/api/leaderboard/top",
    tag = "leaderboard",
    responses(
        (status = 200, description = "Ten best entries", body = [LeaderboardEntry])
    )
)]
pub async fn top_scores_default(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    fetch_top(&state, DEFAULT_TOP_COUNT).await
}

/// GET /api/leaderboard/player/{player_name}
#[utoipa::path(
    get,
    path = "/api/leaderboard/player/{player_name}",
    tag = "leaderboard",
    params(("player_name" = String, Path, description = "Player name, matched case-insensitively")),
    responses(
        (status = 200, description = "The player's entries by score", body = [LeaderboardEntry])
    )
)]
pub async fn player_scores(
    State(state): State<AppState>,
    player_name: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let Path(player_name) = player_name?;
    let rows = run_blocking(&state, move |db| db.get_entries_for_player(&player_name)).await?;
    Ok(Json(to_entries(rows)?))
}

async fn fetch_top(state: &AppState, count: i64) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let rows = run_blocking(state, move |db| db.top_entries(count)).await?;
    Ok(Json(to_entries(rows)?))
}

/// Run a store call on the blocking pool so slow queries never stall the
/// async workers. The connection guard is dropped inside the closure.
async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await?
        .map_err(ApiError::Store)
}

fn to_entries(rows: Vec<EntryRow>) -> Result<Vec<LeaderboardEntry>, ApiError> {
    rows.into_iter().map(to_entry).collect()
}

/// An unparseable `date_completed` surfaces as a store error.
fn to_entry(row: EntryRow) -> Result<LeaderboardEntry, ApiError> {
    let date_completed = DateTime::parse_from_rfc3339(&row.date_completed)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            ApiError::Store(anyhow::anyhow!(
                "corrupt date_completed '{}' on entry {}: {}",
                row.date_completed,
                row.id,
                e
            ))
        })?;

    Ok(LeaderboardEntry {
        id: row.id,
        player_name: row.player_name,
        score: row.score,
        level: row.level,
        date_completed,
    })
}
