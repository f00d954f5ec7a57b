/// Session token issuance and verification
///
/// Session tokens are JWTs signed with HS256 (HMAC-SHA256) carrying the
/// account's email as the identity claim. They are stateless: validity is
/// decided entirely by the signature and the `exp` claim.
///
/// # Security
///
/// - **Algorithm**: HS256 only. Tokens declaring any other algorithm are rejected.
/// - **Expiration**: `exp = iat + validity`; a token is rejected once `now >= exp`
/// - **Secret Management**: the signing key is held in a [`SigningKey`] and never
///   printed, logged or returned
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use tasklist_shared::auth::jwt::{issue_token, verify_token, SigningKey};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let key = SigningKey::new("your-secret-key-at-least-32-bytes")?;
/// let now = Utc::now();
///
/// let token = issue_token("a@b.com", &key, now, Duration::hours(24))?;
/// assert_eq!(verify_token(&token, &key, now)?, "a@b.com");
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::clock::Clock;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token could not be parsed or decoded
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// Signature does not match the signing key, or the algorithm is not HS256
    #[error("Invalid token signature")]
    BadSignature,

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signing key is unusable
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
}

/// Symmetric key used to sign and verify session tokens
///
/// `Debug` output is redacted.
pub struct SigningKey(SecretString);

impl SigningKey {
    /// Wraps a secret, rejecting an empty one
    pub fn new(secret: impl Into<String>) -> Result<Self, JwtError> {
        let secret: String = secret.into();
        if secret.is_empty() {
            return Err(JwtError::InvalidKey("signing key must not be empty".to_string()));
        }
        Ok(Self(SecretString::from(secret)))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}

/// JWT claims structure
///
/// - `email`: identity claim
/// - `iat`: issued at (Unix seconds)
/// - `exp`: expiration (Unix seconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// `now + validity`, or `CreateError` if that is out of range
fn expiry(now: DateTime<Utc>, validity: Duration) -> Result<DateTime<Utc>, JwtError> {
    now.checked_add_signed(validity)
        .ok_or_else(|| JwtError::CreateError("Token expiry is out of range".to_string()))
}

impl Claims {
    /// Creates claims valid from `now` for `validity`
    ///
    /// # Errors
    ///
    /// Returns `JwtError::CreateError` if `now + validity` overflows
    pub fn new(email: impl Into<String>, now: DateTime<Utc>, validity: Duration) -> Result<Self, JwtError> {
        Ok(Self {
            email: email.into(),
            iat: now.timestamp(),
            exp: expiry(now, validity)?.timestamp(),
        })
    }

    /// Checks whether the token is expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Creates a signed token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, key: &SigningKey) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(key.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a session token for `email`, valid from `now` for `validity`
pub fn issue_token(
    email: &str,
    key: &SigningKey,
    now: DateTime<Utc>,
    validity: Duration,
) -> Result<String, JwtError> {
    create_token(&Claims::new(email, now, validity)?, key)
}

/// Validates a token and extracts its claims
///
/// Verifies, in order:
/// - The token has three decodable segments and a parseable header
/// - The header declares HS256
/// - The signature matches `key`
/// - The claims carry `email`, `iat` and `exp`
/// - `now` is before `exp`
///
/// Expiry is checked here against the supplied `now` rather than by
/// `jsonwebtoken`, so callers control the clock and a token is rejected at
/// exactly `exp` with no leeway.
pub fn decode_claims(token: &str, key: &SigningKey, now: DateTime<Utc>) -> Result<Claims, JwtError> {
    let decoding_key = DecodingKey::from_secret(key.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => JwtError::BadSignature,
            ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Malformed(e.to_string()),
        }
    })?;

    if token_data.claims.is_expired_at(now) {
        return Err(JwtError::Expired);
    }

    Ok(token_data.claims)
}

/// Verifies a token and returns only its identity claim
pub fn verify_token(token: &str, key: &SigningKey, now: DateTime<Utc>) -> Result<String, JwtError> {
    decode_claims(token, key, now).map(|claims| claims.email)
}

/// A freshly issued token with its validity window
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,

    /// Seconds until expiry
    pub expires_in: i64,

    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies session tokens with a fixed key, window and clock
///
/// Cheap to clone; intended to be built once at startup and shared.
#[derive(Clone)]
pub struct SessionTokens {
    key: Arc<SigningKey>,
    validity: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionTokens {
    pub fn new(key: SigningKey, validity: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            key: Arc::new(key),
            validity,
            clock,
        }
    }

    /// Issues a token for `email` at the clock's current time
    pub fn issue(&self, email: &str) -> Result<IssuedToken, JwtError> {
        let now = self.clock.now();
        let claims = Claims::new(email, now, self.validity)?;
        let token = create_token(&claims, &self.key)?;

        Ok(IssuedToken {
            token,
            expires_in: claims.exp - claims.iat,
            expires_at: expiry(now, self.validity)?,
        })
    }

    /// Verifies `token` at the clock's current time, returning the email claim
    pub fn verify(&self, token: &str) -> Result<String, JwtError> {
        verify_token(token, &self.key, self.clock.now())
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("key", &self.key)
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}
