/// Authorization middleware for Axum
///
/// Every protected request passes through [`Authorizer::authorize`], which
/// either yields a [`SecurityContext`] or a terminal [`AuthError`]:
///
/// 1. Extract the token from `Authorization: Bearer <token>`
/// 2. Verify it with the process signing key and the injected clock
/// 3. Resolve the email claim to a numeric account ID
/// 4. Hand the context to the next stage via request extensions
///
/// Handlers take a `SecurityContext` argument directly; it can only be
/// present if this gate let the request through.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use tasklist_shared::auth::middleware::{require_auth, Authorizer, SecurityContext};
///
/// async fn protected_handler(ctx: SecurityContext) -> String {
///     format!("Hello, {} ({})", ctx.email, ctx.account_id)
/// }
///
/// fn router(authorizer: Authorizer) -> Router {
///     Router::new()
///         .route("/protected", get(protected_handler))
///         .route_layer(middleware::from_fn_with_state(authorizer, require_auth))
/// }
/// ```

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use super::jwt::{JwtError, SessionTokens};
use crate::store::{AccountDirectory, StoreError};

const BEARER: &str = "Bearer";

/// Authenticated identity for a single request
///
/// Built only by [`Authorizer::authorize`] after the token verified and
/// the account resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityContext {
    /// Identity claim from the token
    pub email: String,

    /// Resolved numeric account ID
    pub account_id: i64,
}

/// Rejections produced by the authorization gate
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No bearer credentials on the request
    #[error("Missing credentials")]
    MissingCredentials,

    /// Token present but not parseable
    #[error("Malformed token")]
    MalformedToken,

    /// Token failed signature or expiry checks
    #[error("{0}")]
    InvalidToken(&'static str),

    /// Token was valid but its account no longer exists
    #[error("no such user: {0}")]
    UnknownAccount(String),

    /// Token verifier or directory failed internally
    #[error("Authorization failed: {0}")]
    Internal(String),

    /// A handler asked for a context the gate never provided
    #[error("Security context missing from request")]
    MissingContext,
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired"),
            JwtError::BadSignature => AuthError::InvalidToken("Invalid token signature"),
            JwtError::Malformed(_) => AuthError::MalformedToken,
            JwtError::CreateError(_) | JwtError::InvalidKey(_) => {
                AuthError::Internal("token verifier misconfigured".to_string())
            }
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(email) => AuthError::UnknownAccount(email),
            StoreError::Storage(msg) => AuthError::Internal(msg),
        }
    }
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::MalformedToken => StatusCode::BAD_REQUEST,
            AuthError::UnknownAccount(_) => StatusCode::NOT_FOUND,
            AuthError::Internal(_) | AuthError::MissingContext => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            AuthError::MissingCredentials | AuthError::InvalidToken(_) => {
                ("unauthorized", self.to_string())
            }
            AuthError::MalformedToken => ("bad_request", self.to_string()),
            AuthError::UnknownAccount(_) => ("not_found", self.to_string()),
            AuthError::Internal(_) | AuthError::MissingContext => {
                tracing::error!("Authorization failed internally: {}", self);
                ("internal_error", "An internal error occurred".to_string())
            }
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

/// Extracts the bearer token from request headers
///
/// The header must be the scheme `Bearer`, whitespace, then a non-empty
/// token; surrounding whitespace is trimmed.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?
        .trim();

    let rest = value
        .strip_prefix(BEARER)
        .ok_or(AuthError::MissingCredentials)?;

    if !rest.starts_with(char::is_whitespace) {
        return Err(AuthError::MissingCredentials);
    }

    let token = rest.trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    Ok(token)
}

/// The authorization gate
///
/// Holds the token verifier and the account directory; stateless across
/// requests and cheap to clone.
#[derive(Clone)]
pub struct Authorizer {
    tokens: SessionTokens,
    directory: Arc<dyn AccountDirectory>,
}

impl Authorizer {
    pub fn new(tokens: SessionTokens, directory: Arc<dyn AccountDirectory>) -> Self {
        Self { tokens, directory }
    }

    /// Decides whether a request may proceed
    ///
    /// # Errors
    ///
    /// - `MissingCredentials` (401): no header, wrong scheme, empty token
    /// - `MalformedToken` (400): token cannot be decoded
    /// - `InvalidToken` (401): bad signature, wrong algorithm, or expired
    /// - `UnknownAccount` (404): the token's account no longer exists
    /// - `Internal` (500): lookup failed
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<SecurityContext, AuthError> {
        let token = bearer_token(headers)?;

        let email = self.tokens.verify(token).map_err(|e| {
            tracing::debug!("Rejected session token: {}", e);
            AuthError::from(e)
        })?;

        let account_id = self.directory.account_id(&email).await.map_err(|e| {
            tracing::warn!("Could not resolve account for verified token: {}", e);
            AuthError::from(e)
        })?;

        Ok(SecurityContext { email, account_id })
    }
}

/// Axum middleware requiring a valid session token
///
/// Use with `axum::middleware::from_fn_with_state(authorizer, require_auth)`.
pub async fn require_auth(
    State(authorizer): State<Authorizer>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let context = authorizer.authorize(req.headers()).await?;
    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for SecurityContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .ok_or(AuthError::MissingContext)
    }
}
