//! # Tasklist API Server Library
//!
//! HTTP surface of the task-list service: public sign-up/sign-in, and
//! per-account todo endpoints behind bearer token authorization.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
