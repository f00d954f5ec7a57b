/// Authentication endpoints
///
/// - `POST /v1/sign_up` - Create an account
/// - `POST /v1/sign_in` - Exchange credentials for a session token

use crate::{app::AppState, error::ApiResult};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tasklist_shared::auth::service::{SignInRequest, SignUpRequest};

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Session token response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Always `Bearer`
    #[serde(rename = "type")]
    pub token_type: String,

    /// Seconds until the token expires
    pub expires_in: i64,

    pub jwt_token: String,
}

/// Registers a new account
///
/// ```text
/// POST /v1/sign_up
/// Content-Type: application/json
///
/// { "email": "a@b.com", "username": "a", "password": "pw" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: a field is missing or empty
/// - `500 Internal Server Error`: hashing or storage failed, including a duplicate email
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(req) = payload?;
    state.accounts.sign_up(req).await?;

    Ok(Json(MessageResponse {
        message: "Successfully signed up!".to_string(),
    }))
}

/// Signs in and returns a bearer token
///
/// ```json
/// { "type": "Bearer", "expires_in": 86400, "jwt_token": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: incorrect password or missing field
/// - `404 Not Found`: no account for this email
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(req) = payload?;
    let issued = state.accounts.sign_in(req).await?;

    Ok(Json(TokenResponse {
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
        jwt_token: issued.token,
    }))
}
