//! In-memory stores with the same semantics as the PostgreSQL ones.
//!
//! Used by tests and for running the API without a database.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{AccountDirectory, StoreError, TodoStore};
use crate::models::account::{Account, NewAccount};
use crate::models::todo::{NewTodo, Todo, TodoUpdate};

#[derive(Debug, Default)]
struct Accounts {
    next_id: i64,
    by_email: HashMap<String, Account>,
}

/// Account directory kept in a map keyed by exact email
#[derive(Debug, Default)]
pub struct InMemoryAccountDirectory {
    inner: RwLock<Accounts>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes an account, as if it had been deleted from the database
    pub async fn remove(&self, email: &str) -> Option<Account> {
        self.inner.write().await.by_email.remove(email)
    }
}

#[async_trait]
impl AccountDirectory for InMemoryAccountDirectory {
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.by_email.contains_key(&account.email) {
            return Err(StoreError::Storage(
                "duplicate key value violates unique constraint on email".to_string(),
            ));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let created = Account {
            id: inner.next_id,
            email: account.email.clone(),
            username: account.username,
            password_hash: account.password_hash,
            created_at: now,
            updated_at: now,
        };
        inner.by_email.insert(account.email, created.clone());

        Ok(created)
    }

    async fn find_account(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.inner.read().await.by_email.get(email).cloned())
    }

    async fn account_id(&self, email: &str) -> Result<i64, StoreError> {
        self.inner
            .read()
            .await
            .by_email
            .get(email)
            .map(|account| account.id)
            .ok_or_else(|| StoreError::NotFound(email.to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Todos {
    next_id: i64,
    rows: Vec<Todo>,
}

/// Todo store kept in a vector in insertion order
#[derive(Debug, Default)]
pub struct InMemoryTodoStore {
    inner: RwLock<Todos>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn list_todos(&self, account_id: i64, include_done: bool) -> Result<Vec<Todo>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .rows
            .iter()
            .filter(|t| t.user_id == account_id && (include_done || !t.done))
            .cloned()
            .collect())
    }

    async fn get_todo(&self, account_id: i64, todo_id: i64) -> Result<Option<Todo>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .rows
            .iter()
            .find(|t| t.user_id == account_id && t.id == todo_id)
            .cloned())
    }

    async fn create_todo(&self, account_id: i64, todo: NewTodo) -> Result<Todo, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;

        let created = Todo {
            id: inner.next_id,
            user_id: account_id,
            task: todo.task,
            category: todo.category.as_str().to_string(),
            priority: todo.priority.as_str().to_string(),
            done: false,
            created_at: Utc::now(),
            completed_at: None,
        };
        inner.rows.push(created.clone());

        Ok(created)
    }

    async fn update_todo(&self, account_id: i64, todo_id: i64, update: TodoUpdate) -> Result<bool, StoreError> {
        if update.is_empty() {
            return Ok(false);
        }

        let mut inner = self.inner.write().await;
        let Some(todo) = inner
            .rows
            .iter_mut()
            .find(|t| t.user_id == account_id && t.id == todo_id)
        else {
            return Ok(false);
        };

        if let Some(task) = update.task {
            todo.task = task;
        }
        if let Some(category) = update.category {
            todo.category = category.as_str().to_string();
        }
        if let Some(priority) = update.priority {
            todo.priority = priority.as_str().to_string();
        }
        if update.done {
            todo.done = true;
            todo.completed_at = Some(Utc::now());
        }

        Ok(true)
    }

    async fn delete_todo(&self, account_id: i64, todo_id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.rows.len();
        inner.rows.retain(|t| !(t.user_id == account_id && t.id == todo_id));
        Ok(inner.rows.len() < before)
    }
}
