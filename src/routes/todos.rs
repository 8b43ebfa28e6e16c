use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    db::{dao::TodoPatch, entities::todo},
    error::AppError,
    response::{ApiResult, JsonResponse},
    services::{ServiceContext, todo_service::TodoService},
    state::AppState,
};

const NOT_FOUND_MESSAGE: &str = "Todo not found";

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    /// Absent or `null` means not completed.
    pub completed: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: i32,
    pub title: String,
    pub completed: bool,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", post(create_todo).get(list_todos))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .with_state(state)
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTodoRequest>,
) -> ApiResult<TodoResponse> {
    let service = todo_service_from_state(state.as_ref());
    let todo = service
        .create(&body.title, body.completed.unwrap_or(false))
        .await?;
    JsonResponse::with_status(StatusCode::CREATED, todo.into())
}

async fn list_todos(State(state): State<Arc<AppState>>) -> ApiResult<Vec<TodoResponse>> {
    let service = todo_service_from_state(state.as_ref());
    let todos = service.list().await?;
    JsonResponse::ok(todos.into_iter().map(TodoResponse::from).collect())
}

async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<TodoResponse> {
    let id = parse_todo_id(&id)?;
    let service = todo_service_from_state(state.as_ref());
    let todo = service.get(id).await?;
    JsonResponse::ok(todo.into())
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Option<Json<UpdateTodoRequest>>,
) -> ApiResult<TodoResponse> {
    // No body and no content type is an update with every field absent.
    let body = body.map(|Json(body)| body).unwrap_or_default();
    tracing::info!(
        id = %id,
        title = ?body.title,
        completed = ?body.completed,
        "updating todo"
    );
    let id = parse_todo_id(&id)?;
    let service = todo_service_from_state(state.as_ref());
    let todo = service.update(id, body.into()).await?;
    JsonResponse::ok(todo.into())
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_todo_id(&id)?;
    let service = todo_service_from_state(state.as_ref());
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// An id that is not an integer can never match a row.
fn parse_todo_id(raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>()
        .map_err(|_| AppError::not_found(NOT_FOUND_MESSAGE))
}

impl From<UpdateTodoRequest> for TodoPatch {
    fn from(body: UpdateTodoRequest) -> Self {
        Self {
            title: body.title,
            completed: body.completed,
        }
    }
}

impl From<todo::Model> for TodoResponse {
    fn from(model: todo::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            completed: model.completed,
        }
    }
}

fn todo_service_from_state(state: &AppState) -> TodoService {
    ServiceContext::from_state(state).todo()
}
