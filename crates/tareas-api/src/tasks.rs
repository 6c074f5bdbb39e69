//! Handlers for `/tareas` endpoints.
//!
//! | Method   | Path           | Notes |
//! |----------|----------------|-------|
//! | `GET`    | `/tareas`      | Active tasks, newest first, with `proxima_ocurrencia` |
//! | `POST`   | `/tareas`      | Body: [`NewTaskData`]; returns 201 + stored task |
//! | `GET`    | `/tareas/{id}` | Single task |
//! | `PATCH`  | `/tareas/{id}` | Body: [`UpdateTaskData`] |
//! | `DELETE` | `/tareas/{id}` | Soft delete; returns 204 |

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tareas_core::models::{NewTaskData, Task, TaskId, TaskSummary, UpdateTaskData};
use tareas_core::repository::Repository;

use crate::{
    error::{ApiError, ApiJson, ApiPath},
    today, AppState, CurrentUser,
};

/// `GET /tareas`
pub async fn list<R>(
    State(state): State<AppState<R>>,
    CurrentUser(owner): CurrentUser,
) -> Result<Json<Vec<TaskSummary>>, ApiError>
where
    R: Repository + Send + Sync + 'static,
{
    let tasks = state.repo.list_task_summaries(owner, today()).await?;
    Ok(Json(tasks))
}

/// `POST /tareas`
pub async fn create<R>(
    State(state): State<AppState<R>>,
    CurrentUser(owner): CurrentUser,
    ApiJson(body): ApiJson<NewTaskData>,
) -> Result<impl IntoResponse, ApiError>
where
    R: Repository + Send + Sync + 'static,
{
    let task = state.repo.add_task(owner, body).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /tareas/{id}`
pub async fn get_one<R>(
    State(state): State<AppState<R>>,
    CurrentUser(owner): CurrentUser,
    ApiPath(id): ApiPath<TaskId>,
) -> Result<Json<Task>, ApiError>
where
    R: Repository + Send + Sync + 'static,
{
    let task = state
        .repo
        .find_task_owned_by(owner, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task not found: {id}")))?;
    Ok(Json(task))
}

/// `PATCH /tareas/{id}`
pub async fn update<R>(
    State(state): State<AppState<R>>,
    CurrentUser(owner): CurrentUser,
    ApiPath(id): ApiPath<TaskId>,
    ApiJson(body): ApiJson<UpdateTaskData>,
) -> Result<Json<Task>, ApiError>
where
    R: Repository + Send + Sync + 'static,
{
    let task = state.repo.update_task(owner, id, body).await?;
    Ok(Json(task))
}

/// `DELETE /tareas/{id}`
pub async fn delete<R>(
    State(state): State<AppState<R>>,
    CurrentUser(owner): CurrentUser,
    ApiPath(id): ApiPath<TaskId>,
) -> Result<StatusCode, ApiError>
where
    R: Repository + Send + Sync + 'static,
{
    state.repo.deactivate_task(owner, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
