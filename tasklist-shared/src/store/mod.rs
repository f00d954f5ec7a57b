/// Storage interfaces used by the authentication core and the todo handlers
///
/// Both traits are object safe and shared as `Arc<dyn ...>` so the server
/// can run against PostgreSQL while tests use the in-memory implementations.
///
/// - [`postgres`]: `PgAccountDirectory`, `PgTodoStore`
/// - [`memory`]: `InMemoryAccountDirectory`, `InMemoryTodoStore`

use async_trait::async_trait;

use crate::models::account::{Account, NewAccount};
use crate::models::todo::{NewTodo, Todo, TodoUpdate};

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryAccountDirectory, InMemoryTodoStore};
pub use postgres::{PgAccountDirectory, PgTodoStore};

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No account exists for the given identity
    #[error("no such user: {0}")]
    NotFound(String),

    /// Any other storage failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

/// Account lookup and creation
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Persists a new account
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Finds an account by its exact email
    async fn find_account(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Resolves an email to its numeric account ID
    ///
    /// Returns `StoreError::NotFound` when no account has this email.
    async fn account_id(&self, email: &str) -> Result<i64, StoreError>;

    /// Checks that the backing storage is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Todo persistence, always scoped to the owning account
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Lists an account's todos; done ones only when `include_done`
    async fn list_todos(&self, account_id: i64, include_done: bool) -> Result<Vec<Todo>, StoreError>;

    async fn get_todo(&self, account_id: i64, todo_id: i64) -> Result<Option<Todo>, StoreError>;

    async fn create_todo(&self, account_id: i64, todo: NewTodo) -> Result<Todo, StoreError>;

    /// Applies `update`; returns false when the todo does not exist for this account
    async fn update_todo(&self, account_id: i64, todo_id: i64, update: TodoUpdate) -> Result<bool, StoreError>;

    /// Returns false when the todo does not exist for this account
    async fn delete_todo(&self, account_id: i64, todo_id: i64) -> Result<bool, StoreError>;
}
