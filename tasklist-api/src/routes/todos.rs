/// Todo endpoints
///
/// All routes sit behind the bearer token gate and act only on the
/// caller's own todos. Another account's todo is reported exactly like a
/// missing one.
///
/// - `GET    /v1/todos[?all=true]` - List todos; done ones only with `all=true`
/// - `POST   /v1/todos` - Create a todo
/// - `GET    /v1/todos/:id` - Get one todo
/// - `PUT    /v1/todos/:id` - Partially update, or mark done
/// - `DELETE /v1/todos/:id` - Delete a todo

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::auth::MessageResponse,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;
use tasklist_shared::{
    auth::middleware::SecurityContext,
    models::todo::{Category, NewTodo, Priority, Todo, TodoUpdate},
};

/// List query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListTodosQuery {
    /// Include todos already marked done
    #[serde(default)]
    pub all: bool,
}

/// Create request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateTodoRequest {
    pub task: String,
    pub category: String,
    pub priority: String,
}

impl TryFrom<CreateTodoRequest> for NewTodo {
    type Error = ApiError;

    fn try_from(req: CreateTodoRequest) -> Result<Self, Self::Error> {
        if req.task.is_empty() {
            return Err(ApiError::BadRequest(
                "inadequate input parameters. Required field: task".to_string(),
            ));
        }

        Ok(NewTodo {
            task: req.task,
            category: req.category.parse::<Category>().map_err(ApiError::BadRequest)?,
            priority: req.priority.parse::<Priority>().map_err(ApiError::BadRequest)?,
        })
    }
}

/// Update request; absent or empty fields are left unchanged
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateTodoRequest {
    pub task: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub done: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl TryFrom<UpdateTodoRequest> for TodoUpdate {
    type Error = ApiError;

    fn try_from(req: UpdateTodoRequest) -> Result<Self, Self::Error> {
        let update = TodoUpdate {
            task: non_empty(req.task),
            category: non_empty(req.category)
                .map(|c| c.parse::<Category>())
                .transpose()
                .map_err(ApiError::BadRequest)?,
            priority: non_empty(req.priority)
                .map(|p| p.parse::<Priority>())
                .transpose()
                .map_err(ApiError::BadRequest)?,
            done: req.done,
        };

        if update.is_empty() {
            return Err(ApiError::BadRequest("empty body is not supported".to_string()));
        }

        Ok(update)
    }
}

fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("invalid id given {}", raw)))
}

fn todo_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("todo {} not found", id))
}

pub async fn list_todos(
    State(state): State<AppState>,
    ctx: SecurityContext,
    query: Result<Query<ListTodosQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Todo>>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let todos = state.todos.list_todos(ctx.account_id, query.all).await?;
    Ok(Json(todos))
}

pub async fn create_todo(
    State(state): State<AppState>,
    ctx: SecurityContext,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<Json<Todo>> {
    let Json(req) = payload?;
    let new_todo = NewTodo::try_from(req)?;

    let todo = state.todos.create_todo(ctx.account_id, new_todo).await?;
    tracing::debug!(account_id = ctx.account_id, todo_id = todo.id, "Todo created");

    Ok(Json(todo))
}

pub async fn get_todo(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Todo>> {
    let id = parse_id(&id)?;

    state
        .todos
        .get_todo(ctx.account_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| todo_not_found(id))
}

/// Applies a partial update and returns the updated todo
pub async fn update_todo(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ApiResult<Json<Todo>> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let update = TodoUpdate::try_from(req)?;

    if !state.todos.update_todo(ctx.account_id, id, update).await? {
        return Err(todo_not_found(id));
    }

    state
        .todos
        .get_todo(ctx.account_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| todo_not_found(id))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;

    if !state.todos.delete_todo(ctx.account_id, id).await? {
        return Err(todo_not_found(id));
    }

    Ok(Json(MessageResponse {
        message: format!("todo {} deleted", id),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_task() {
        let err = NewTodo::try_from(CreateTodoRequest {
            category: "work".to_string(),
            priority: "low".to_string(),
            ..Default::default()
        })
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Bad request: inadequate input parameters. Required field: task"
        );
    }

    #[test]
    fn test_create_accepts_whitespace_task() {
        let todo = NewTodo::try_from(CreateTodoRequest {
            task: "   ".to_string(),
            category: "work".to_string(),
            priority: "low".to_string(),
        })
        .unwrap();

        assert_eq!(todo.task, "   ");
    }

    #[test]
    fn test_create_rejects_unknown_enums() {
        let err = NewTodo::try_from(CreateTodoRequest {
            task: "t".to_string(),
            category: "Garden".to_string(),
            priority: "low".to_string(),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: unknown category value: Garden");

        let ok = NewTodo::try_from(CreateTodoRequest {
            task: "t".to_string(),
            category: "WORK".to_string(),
            priority: "High".to_string(),
        })
        .unwrap();
        assert_eq!(ok.category, Category::Work);
        assert_eq!(ok.priority, Priority::High);
    }

    #[test]
    fn test_update_rejects_empty_body() {
        let err = TodoUpdate::try_from(UpdateTodoRequest::default()).unwrap_err();
        assert_eq!(err.to_string(), "Bad request: empty body is not supported");

        let err = TodoUpdate::try_from(UpdateTodoRequest {
            task: Some(String::new()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: empty body is not supported");
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(
            parse_id("abc").unwrap_err().to_string(),
            "Bad request: invalid id given abc"
        );
    }
}
