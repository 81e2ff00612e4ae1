//! Todo API endpoints

use api_types::{
    ApiResponse,
    todo::{Todo, TodoNew},
};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use engine::{TodoCmd, TodoUpdateCmd};

use crate::{
    ServerError,
    extract::{ApiJson, ApiPath},
    server::{ServerState, UserId},
};

fn map_todo(todo: engine::Todo) -> Todo {
    Todo {
        id: todo.id,
        title: todo.title,
        description: todo.description,
        status: todo.status,
        priority: todo.priority.as_str().to_string(),
        completed: todo.completed,
        due_date: todo.due_date,
        created_at: todo.created_at,
        updated_at: todo.updated_at,
    }
}

pub async fn list(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<Todo>>>, ServerError> {
    let todos = state
        .engine
        .todos(user.as_str())
        .await?
        .into_iter()
        .map(map_todo)
        .collect();

    Ok(Json(ApiResponse::data(todos)))
}

pub async fn get(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<Todo>>, ServerError> {
    let todo = state.engine.todo(user.as_str(), &id).await?;
    Ok(Json(ApiResponse::data(map_todo(todo))))
}

/// Create a todo. One with a due date shows up in the notification and event
/// stores too.
pub async fn create(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<TodoNew>,
) -> Result<(StatusCode, Json<ApiResponse<Todo>>), ServerError> {
    let cmd = TodoCmd {
        title: payload.title,
        description: payload.description,
        status: payload.status,
        priority: payload.priority,
        due_date: payload.due_date,
    };
    let todo = state.engine.create_todo(user.as_str(), cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(map_todo(todo))),
    ))
}

pub async fn update(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(payload): ApiJson<TodoNew>,
) -> Result<Json<ApiResponse<Todo>>, ServerError> {
    let cmd = TodoUpdateCmd {
        title: payload.title,
        description: payload.description,
        status: payload.status,
        priority: payload.priority,
        completed: payload.completed,
        due_date: payload.due_date,
    };
    let todo = state.engine.update_todo(user.as_str(), &id, cmd).await?;

    Ok(Json(ApiResponse::data(map_todo(todo))))
}

pub async fn delete(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state.engine.delete_todo(user.as_str(), &id).await?;
    Ok(Json(ApiResponse::message("Todo deleted successfully")))
}
