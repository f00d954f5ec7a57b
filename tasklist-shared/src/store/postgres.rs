//! PostgreSQL-backed stores.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{AccountDirectory, StoreError, TodoStore};
use crate::models::account::{Account, NewAccount};
use crate::models::todo::{NewTodo, Todo, TodoUpdate};

/// Account directory over the `users` table
#[derive(Debug, Clone)]
pub struct PgAccountDirectory {
    pool: PgPool,
}

impl PgAccountDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountDirectory for PgAccountDirectory {
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        Ok(Account::create(&self.pool, account).await?)
    }

    async fn find_account(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(Account::find_by_email(&self.pool, email).await?)
    }

    async fn account_id(&self, email: &str) -> Result<i64, StoreError> {
        Account::find_id_by_email(&self.pool, email)
            .await?
            .ok_or_else(|| StoreError::NotFound(email.to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Todo store over the `todos` table
#[derive(Debug, Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn list_todos(&self, account_id: i64, include_done: bool) -> Result<Vec<Todo>, StoreError> {
        Ok(Todo::list_by_user(&self.pool, account_id, include_done).await?)
    }

    async fn get_todo(&self, account_id: i64, todo_id: i64) -> Result<Option<Todo>, StoreError> {
        Ok(Todo::find(&self.pool, account_id, todo_id).await?)
    }

    async fn create_todo(&self, account_id: i64, todo: NewTodo) -> Result<Todo, StoreError> {
        Ok(Todo::create(&self.pool, account_id, todo).await?)
    }

    async fn update_todo(&self, account_id: i64, todo_id: i64, update: TodoUpdate) -> Result<bool, StoreError> {
        Ok(Todo::update(&self.pool, account_id, todo_id, update).await?)
    }

    async fn delete_todo(&self, account_id: i64, todo_id: i64) -> Result<bool, StoreError> {
        Ok(Todo::delete(&self.pool, account_id, todo_id).await?)
    }
}
