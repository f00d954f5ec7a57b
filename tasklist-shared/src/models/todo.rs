/// Todo model and database operations
///
/// Every query is filtered by `user_id`, so a todo is invisible to any
/// account other than its owner.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todos (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     task TEXT NOT NULL,
///     category VARCHAR(16) NOT NULL DEFAULT 'home',
///     priority VARCHAR(16) NOT NULL DEFAULT 'low',
///     done BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     completed_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;

/// Todo category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Home,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Home => "home",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "work" => Ok(Category::Work),
            "home" => Ok(Category::Home),
            _ => Err(format!("unknown category value: {}", s)),
        }
    }
}

/// Todo priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("unknown priority value: {}", s)),
        }
    }
}

/// A task record owned by one account
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,

    /// Owning account
    #[serde(skip_serializing)]
    pub user_id: i64,

    pub task: String,

    pub category: String,

    pub priority: String,

    pub done: bool,

    pub created_at: DateTime<Utc>,

    /// Set when the todo is marked done
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Validated input for a new todo
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub task: String,
    pub category: Category,
    pub priority: Priority,
}

/// Validated partial update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TodoUpdate {
    pub task: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,

    /// `true` marks the todo done and stamps `completed_at`
    pub done: bool,
}

impl TodoUpdate {
    pub fn is_empty(&self) -> bool {
        self.task.is_none() && self.category.is_none() && self.priority.is_none() && !self.done
    }
}

const TODO_COLUMNS: &str = "id, user_id, task, category, priority, done, created_at, completed_at";

impl Todo {
    pub async fn create(pool: &PgPool, user_id: i64, data: NewTodo) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO todos (user_id, task, category, priority) VALUES ($1, $2, $3, $4) RETURNING {}",
            TODO_COLUMNS
        );

        sqlx::query_as::<_, Todo>(&query)
            .bind(user_id)
            .bind(data.task)
            .bind(data.category.as_str())
            .bind(data.priority.as_str())
            .fetch_one(pool)
            .await
    }

    /// Lists an account's todos, oldest first
    pub async fn list_by_user(pool: &PgPool, user_id: i64, include_done: bool) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = format!("SELECT {} FROM todos WHERE user_id = $1", TODO_COLUMNS);
        if !include_done {
            query.push_str(" AND NOT done");
        }
        query.push_str(" ORDER BY id");

        sqlx::query_as::<_, Todo>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find(pool: &PgPool, user_id: i64, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM todos WHERE user_id = $1 AND id = $2", TODO_COLUMNS);

        sqlx::query_as::<_, Todo>(&query)
            .bind(user_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Applies a partial update
    ///
    /// Returns true if a row owned by `user_id` was updated.
    pub async fn update(pool: &PgPool, user_id: i64, id: i64, data: TodoUpdate) -> Result<bool, sqlx::Error> {
        let mut sets: Vec<String> = Vec::new();
        let mut bind_count = 2;

        if data.task.is_some() {
            bind_count += 1;
            sets.push(format!("task = ${}", bind_count));
        }
        if data.category.is_some() {
            bind_count += 1;
            sets.push(format!("category = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            sets.push(format!("priority = ${}", bind_count));
        }
        if data.done {
            sets.push("done = TRUE".to_string());
            sets.push("completed_at = NOW()".to_string());
        }

        if sets.is_empty() {
            return Ok(false);
        }

        let query = format!(
            "UPDATE todos SET {} WHERE user_id = $1 AND id = $2",
            sets.join(", ")
        );

        let mut q = sqlx::query(&query).bind(user_id).bind(id);

        if let Some(task) = data.task {
            q = q.bind(task);
        }
        if let Some(category) = data.category {
            q = q.bind(category.as_str());
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority.as_str());
        }

        let result = q.execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("Work".parse::<Category>().unwrap(), Category::Work);
        assert_eq!("HOME".parse::<Category>().unwrap(), Category::Home);
        assert_eq!(
            "garden".parse::<Category>().unwrap_err(),
            "unknown category value: garden"
        );
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("medium".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!("High".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(
            "urgent".parse::<Priority>().unwrap_err(),
            "unknown priority value: urgent"
        );
    }

    #[test]
    fn test_update_is_empty() {
        assert!(TodoUpdate::default().is_empty());
        assert!(!TodoUpdate {
            done: true,
            ..Default::default()
        }
        .is_empty());
        assert!(!TodoUpdate {
            priority: Some(Priority::Low),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_owner_not_serialized() {
        let todo = Todo {
            id: 7,
            user_id: 3,
            task: "buy milk".to_string(),
            category: "home".to_string(),
            priority: "low".to_string(),
            done: false,
            created_at: Utc::now(),
            completed_at: None,
        };

        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 7);
        assert!(json.get("user_id").is_none());
        assert!(json.get("completed_at").is_none());
    }
}
