use utoipa::OpenApi;

use leaderboard_types::api::{CreateEntryRequest, ProblemDetails};
use leaderboard_types::models::LeaderboardEntry;

use crate::entries;

/// Where Swagger UI serves the generated document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "Leaderboard API"),
    paths(
        entries::list_entries,
        entries::get_entry,
        entries::create_entry,
        entries::delete_entry,
        entries::top_scores,
        entries::top_scores_default,
        entries::player_scores
    ),
    components(schemas(LeaderboardEntry, CreateEntryRequest, ProblemDetails)),
    tags((name = "leaderboard", description = "Game score entries"))
)]
pub struct ApiDoc;
