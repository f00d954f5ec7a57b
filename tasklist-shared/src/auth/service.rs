/// Sign-up and sign-in flows
///
/// [`AccountService`] ties the credential hasher, the session token issuer
/// and the account directory together. HTTP handlers only deserialize the
/// request and map [`AccountError`] onto a response.
///
/// Hashing and verification run on the blocking thread pool.

use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::jwt::{IssuedToken, JwtError, SessionTokens};
use super::password::{verify_password, CredentialHasher, PasswordError};
use crate::models::account::{Account, NewAccount};
use crate::store::{AccountDirectory, StoreError};

/// Sign-up request
#[derive(Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SignUpRequest {
    #[validate(length(min = 1, message = "Required field: email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Required field: username"))]
    pub username: String,

    #[validate(length(min = 1, message = "Required field: password"))]
    pub password: String,
}

impl std::fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Sign-in request
#[derive(Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SignInRequest {
    #[validate(length(min = 1, message = "Required field: email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Required field: password"))]
    pub password: String,
}

impl std::fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Error type for account flows
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Request failed field validation
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// No account exists for the email
    #[error("no such user: {0}")]
    NoSuchUser(String),

    #[error("incorrect password")]
    IncorrectPassword,

    #[error(transparent)]
    Hashing(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error(transparent)]
    Directory(#[from] StoreError),
}

/// Account creation and authentication
#[derive(Clone)]
pub struct AccountService {
    directory: Arc<dyn AccountDirectory>,
    hasher: CredentialHasher,
    tokens: SessionTokens,
}

impl AccountService {
    pub fn new(
        directory: Arc<dyn AccountDirectory>,
        hasher: CredentialHasher,
        tokens: SessionTokens,
    ) -> Self {
        Self {
            directory,
            hasher,
            tokens,
        }
    }

    /// Registers a new account
    ///
    /// # Errors
    ///
    /// - `Validation` if any field is empty
    /// - `Hashing` if the password could not be hashed
    /// - `Directory` if persisting fails, including a duplicate email
    pub async fn sign_up(&self, req: SignUpRequest) -> Result<Account, AccountError> {
        req.validate()?;

        let SignUpRequest {
            email,
            username,
            password,
        } = req;

        let hasher = self.hasher;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::HashError(format!("Hashing task failed: {}", e)))??;

        let account = self
            .directory
            .create_account(NewAccount {
                email,
                username,
                password_hash,
            })
            .await?;

        tracing::info!(account_id = account.id, "Account created");

        Ok(account)
    }

    /// Authenticates an account and issues a session token
    ///
    /// # Errors
    ///
    /// - `Validation` if email or password is empty
    /// - `NoSuchUser` if no account has this email
    /// - `IncorrectPassword` if the password does not match
    /// - `Hashing` if the stored hash is unusable
    /// - `Token` if signing fails
    pub async fn sign_in(&self, req: SignInRequest) -> Result<IssuedToken, AccountError> {
        req.validate()?;

        let SignInRequest { email, password } = req;

        let account = self
            .directory
            .find_account(&email)
            .await?
            .ok_or_else(|| AccountError::NoSuchUser(email.clone()))?;

        let stored = account.password_hash;
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| PasswordError::VerifyError(format!("Verification task failed: {}", e)))??;

        if !matches {
            tracing::debug!(account_id = account.id, "Sign-in rejected: incorrect password");
            return Err(AccountError::IncorrectPassword);
        }

        let issued = self.tokens.issue(&account.email)?;
        tracing::info!(account_id = account.id, "Session token issued");

        Ok(issued)
    }
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("hasher", &self.hasher)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
