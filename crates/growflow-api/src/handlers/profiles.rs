//! Profile directory HTTP handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use growflow_core::{Profile, ProfileRepository};

use crate::{ApiError, AppState};

/// Query parameters for the profile directory.
#[derive(Debug, Deserialize)]
pub struct ListProfilesQuery {
    /// Partial name or email match.
    #[serde(default)]
    pub search: Option<String>,
}

/// List profiles for assignee pickers, optionally filtered.
pub async fn list_profiles(
    State(state): State<AppState>,
    Query(query): Query<ListProfilesQuery>,
) -> Result<Json<Vec<Profile>>, ApiError> {
    let profiles = state.db.profiles.list(query.search.as_deref()).await?;
    Ok(Json(profiles))
}
