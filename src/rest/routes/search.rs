//! Server-side biodata search endpoint.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::rest::dto::{SearchPageResponse, SearchParams};
use crate::rest::state::ApiState;
use crate::search::{run_search, SearchQuery};

/// Search approved biodata with filters and pagination
#[utoipa::path(
    get,
    path = "/api/v1/profiles/search",
    tag = "Search",
    params(SearchParams),
    responses(
        (status = 200, description = "One page of matches", body = SearchPageResponse)
    )
)]
pub async fn search(
    State(state): State<ApiState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchPageResponse> {
    let mut query = SearchQuery::from(params);
    // Config bounds the page size; the search module enforces its own cap.
    query.per_page = Some(
        query
            .per_page
            .unwrap_or(state.config.search.default_page_size)
            .min(state.config.search.max_page_size),
    );

    let profiles = state.profiles.read().await;
    let page = run_search(profiles.approved(), &query);
    Json(SearchPageResponse::from(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::profile::ProfileStatus;
    use tempfile::TempDir;

    async fn seeded_state(dir: &TempDir, count: u32) -> ApiState {
        let mut config = Config::default();
        config.paths.data = dir.path().join("data").to_string_lossy().to_string();
        config.paths.state = dir.path().join("state").to_string_lossy().to_string();
        let state = ApiState::new(config);

        {
            let mut profiles = state.profiles.write().await;
            for i in 0..count {
                let id = profiles.create(format!("u{i}@example.com")).id;
                let profile = profiles.get_mut(&id).unwrap();
                profile.status = ProfileStatus::Approved;
                profile.fields = serde_json::from_str(&format!(
                    r#"{{"biodataType": "Bride", "age": {}, "religion": "Islam"}}"#,
                    20 + i
                ))
                .unwrap();
            }
        }
        state
    }

    #[tokio::test]
    async fn test_search_returns_approved_profiles() {
        let dir = TempDir::new().unwrap();
        let state = seeded_state(&dir, 4).await;

        let resp = search(State(state), Query(SearchParams::default())).await;
        assert_eq!(resp.total, 4);
        assert_eq!(resp.items.len(), 4);
    }

    #[tokio::test]
    async fn test_search_applies_filters_and_paging() {
        let dir = TempDir::new().unwrap();
        let state = seeded_state(&dir, 9).await;

        let resp = search(
            State(state),
            Query(SearchParams {
                age_min: Some(22),
                per_page: Some(3),
                page: Some(2),
                ..SearchParams::default()
            }),
        )
        .await;
        assert_eq!(resp.total, 7); // ages 22..=28
        assert_eq!(resp.total_pages, 3);
        assert_eq!(resp.items.len(), 3);
        assert_eq!(resp.page, 2);
    }

    #[tokio::test]
    async fn test_search_defaults_page_size_from_config() {
        let dir = TempDir::new().unwrap();
        let state = seeded_state(&dir, 15).await;
        let default_size = state.config.search.default_page_size;

        let resp = search(State(state), Query(SearchParams::default())).await;
        assert_eq!(resp.per_page, default_size);
        assert_eq!(resp.items.len(), default_size);
    }
}
