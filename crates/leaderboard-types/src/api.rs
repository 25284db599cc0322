use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 100;
pub const DEFAULT_TOP_COUNT: i64 = 10;

// -- Entries --

/// Body of `POST /api/leaderboard`.
///
/// Every field is optional at the wire level so that a missing field is
/// reported as a validation problem instead of a deserialization failure.
/// `id` and `dateCompleted` are assigned by the server; if a client sends
/// them they are ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    #[schema(max_length = 100, example = "Sam")]
    pub player_name: Option<String>,
    #[schema(minimum = 0, example = 500)]
    pub score: Option<i64>,
    #[schema(max_length = 50, example = "L1")]
    pub level: Option<String>,
}

/// Query string of `GET /api/leaderboard`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1-based page number. Values below 1 are treated as 1.
    pub page: Option<i64>,
    /// Rows per page. Values below 1 are treated as 100.
    pub page_size: Option<i64>,
}

impl ListQuery {
    pub fn page(&self) -> i64 {
        match self.page {
            Some(page) if page >= 1 => page,
            _ => DEFAULT_PAGE,
        }
    }

    pub fn page_size(&self) -> i64 {
        match self.page_size {
            Some(size) if size >= 1 => size,
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    /// Rows to skip before the requested page. Saturates instead of
    /// overflowing for absurd page numbers, which then just yield nothing.
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }
}

// -- Errors --

/// Error body for 4xx/5xx responses, shaped like RFC 7807 problem details.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetails {
    pub title: String,
    pub status: u16,
    /// Field name -> messages. Only present on validation failures.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults() {
        let q = ListQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.page_size(), 100);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn list_query_substitutes_invalid_values() {
        let q = ListQuery { page: Some(0), page_size: Some(-3) };
        assert_eq!(q.page(), 1);
        assert_eq!(q.page_size(), 100);

        let q = ListQuery { page: Some(3), page_size: Some(25) };
        assert_eq!(q.offset(), 50);
    }

    #[test]
    fn list_query_offset_saturates() {
        let q = ListQuery { page: Some(i64::MAX), page_size: Some(i64::MAX) };
        assert_eq!(q.offset(), i64::MAX);
    }

    #[test]
    fn list_query_reads_camel_case() {
        let q: ListQuery = serde_json::from_str(r#"{"page":2,"pageSize":2}"#).unwrap();
        assert_eq!(q.page(), 2);
        assert_eq!(q.page_size(), 2);
    }

    #[test]
    fn create_request_ignores_server_fields() {
        let req: CreateEntryRequest = serde_json::from_str(
            r#"{"id":7,"playerName":"Sam","score":5,"level":"L1","dateCompleted":"2020-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(req.player_name.as_deref(), Some("Sam"));
        assert_eq!(req.score, Some(5));
    }
}
