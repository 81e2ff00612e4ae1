//! Cooking session API endpoints

use api_types::{
    ApiResponse,
    cooking::{CookingSession, CookingSessionSave},
};
use axum::{
    Extension, Json,
    extract::State,
};
use engine::CookingSessionCmd;

use crate::{
    ServerError,
    extract::{ApiJson, ApiPath},
    server::{ServerState, UserId},
};

fn map_session(session: engine::CookingSession) -> CookingSession {
    CookingSession {
        recipe_id: session.recipe_id,
        is_playing: session.is_playing,
        is_paused: session.is_paused,
        start_time: session.start_time,
        pause_time: session.pause_time,
        total_pause_duration: session.total_pause_duration,
        checked_steps: session.checked_steps,
        updated_at: session.updated_at,
    }
}

/// The saved session of a recipe; `data` is `null` when there is none.
pub async fn get(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(recipe_id): ApiPath<String>,
) -> Result<Json<ApiResponse<Option<CookingSession>>>, ServerError> {
    let session = state
        .engine
        .cooking_session(user.as_str(), &recipe_id)
        .await?
        .map(map_session);

    Ok(Json(ApiResponse::data(session)))
}

pub async fn save(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(recipe_id): ApiPath<String>,
    ApiJson(payload): ApiJson<CookingSessionSave>,
) -> Result<Json<ApiResponse<CookingSession>>, ServerError> {
    let cmd = CookingSessionCmd {
        is_playing: payload.is_playing,
        is_paused: payload.is_paused,
        start_time: payload.start_time,
        pause_time: payload.pause_time,
        total_pause_duration: payload.total_pause_duration,
        checked_steps: payload.checked_steps,
    };
    let session = state
        .engine
        .save_cooking_session(user.as_str(), &recipe_id, cmd)
        .await?;

    Ok(Json(ApiResponse::data(map_session(session))))
}

pub async fn delete(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(recipe_id): ApiPath<String>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state
        .engine
        .delete_cooking_session(user.as_str(), &recipe_id)
        .await?;
    Ok(Json(ApiResponse::ok()))
}
