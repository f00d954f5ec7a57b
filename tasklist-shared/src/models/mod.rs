/// Database models
///
/// - `account`: User accounts and credential hashes
/// - `todo`: Per-account task records

pub mod account;
pub mod todo;
