/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Sign-up and sign-in
/// - `todos`: Per-account todo CRUD

pub mod auth;
pub mod health;
pub mod todos;
