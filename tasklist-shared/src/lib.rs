//! # Tasklist Shared Library
//!
//! Types, storage and authentication used by the Tasklist API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, session tokens, request authorization, sign-up/sign-in
//! - `models`: Database models and their queries
//! - `store`: Storage traits with PostgreSQL and in-memory implementations
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the Tasklist shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
