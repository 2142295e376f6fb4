//! The demo todo resource, backed by `TodoStore`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppError, state::AppState};

const INVALID_BODY: &str = "Title (string) and priority (number) are required";
const NOT_FOUND: &str = "Todo not found";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Todo {
    pub id: String,
    pub title: String,
    /// Kept exactly as sent, integer or float.
    #[schema(value_type = f64)]
    pub priority: Number,
}

/// Request body for create and update. Both fields are optional at the
/// decoding level so that a missing field is reported like an empty one.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TodoInput {
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    #[validate(required)]
    #[schema(value_type = Option<f64>)]
    pub priority: Option<Number>,
}

impl TodoInput {
    /// Decode and validate, collapsing every failure into the same 400.
    fn parse(body: Result<Json<TodoInput>, JsonRejection>) -> Result<(String, Number), AppError> {
        let invalid = || AppError::BadRequest(INVALID_BODY.to_string());
        let Json(input) = body.map_err(|rejection| {
            debug!(%rejection, "todo body rejected");
            invalid()
        })?;
        input.validate().map_err(|errors| {
            debug!(%errors, "todo body failed validation");
            invalid()
        })?;
        match (input.title, input.priority) {
            (Some(title), Some(priority)) => Ok((title, priority)),
            _ => Err(invalid()),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route(
            "/api/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}

#[utoipa::path(
    get,
    path = "/api/todos",
    tag = "todos",
    responses((status = 200, description = "All todos", body = [Todo]))
)]
pub async fn list_todos(State(state): State<AppState>) -> Json<Vec<Todo>> {
    Json(state.todos.find_all().await)
}

#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = String, Path, description = "Todo id")),
    responses(
        (status = 200, description = "The todo", body = Todo),
        (status = 404, description = "Todo not found")
    )
)]
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    state
        .todos
        .find_by_id(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

#[utoipa::path(
    post,
    path = "/api/todos",
    tag = "todos",
    request_body = TodoInput,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 400, description = "Missing or invalid title or priority")
    )
)]
pub async fn create_todo(
    State(state): State<AppState>,
    body: Result<Json<TodoInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let (title, priority) = TodoInput::parse(body)?;
    let todo = Todo {
        id: Uuid::new_v4().to_string(),
        title,
        priority,
    };
    let todo = state.todos.create(todo).await;
    Ok((StatusCode::CREATED, Json(todo)))
}

#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = String, Path, description = "Todo id")),
    request_body = TodoInput,
    responses(
        (status = 200, description = "Todo replaced", body = Todo),
        (status = 400, description = "Missing or invalid title or priority"),
        (status = 404, description = "Todo not found")
    )
)]
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TodoInput>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    let (title, priority) = TodoInput::parse(body)?;
    let todo = Todo {
        id: id.clone(),
        title,
        priority,
    };
    state
        .todos
        .update(&id, todo)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = String, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 404, description = "Todo not found")
    )
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.todos.delete(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(NOT_FOUND.to_string()))
    }
}
