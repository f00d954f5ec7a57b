/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id credential hashing and verification
/// - [`jwt`]: HS256 session token issuance and verification
/// - [`clock`]: Time source injected into token handling
/// - [`middleware`]: Bearer token gate producing a [`middleware::SecurityContext`]
/// - [`service`]: Sign-up and sign-in flows
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chrono::Duration;
/// use tasklist_shared::auth::clock::SystemClock;
/// use tasklist_shared::auth::jwt::{SessionTokens, SigningKey};
/// use tasklist_shared::auth::password::{verify_password, CredentialHasher, HashingPolicy};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = CredentialHasher::new(HashingPolicy::default());
/// let hash = hasher.hash("my_password")?;
/// assert!(verify_password("my_password", &hash)?);
///
/// let key = SigningKey::new("signing-key-of-at-least-32-bytes!!")?;
/// let tokens = SessionTokens::new(key, Duration::hours(24), Arc::new(SystemClock));
/// let issued = tokens.issue("a@b.com")?;
/// assert_eq!(tokens.verify(&issued.token)?, "a@b.com");
/// # Ok(())
/// # }
/// ```

pub mod clock;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;
