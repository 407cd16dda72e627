// handlers/protected/task.rs - POST /task/, GET /tasks/

use axum::{extract::State, Extension};

use crate::database::models::{NewTask, Task};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Message, Payload};
use crate::state::AppState;

/// POST /task/ - Create a task owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Payload(input): Payload<NewTask>,
) -> ApiResult<Message> {
    let task = state.store.insert_task(Task::new(user.user_id, input)).await?;
    tracing::debug!("Task {} created for {}", task.id, user.username);
    Ok(ApiResponse::created_message("Task added successfully"))
}

/// GET /tasks/ - The caller's tasks, oldest first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Task>> {
    let tasks = state.store.list_tasks(user.user_id).await?;
    Ok(ApiResponse::success(tasks))
}
