//! User JWT authentication
//!
//! Issues and verifies the bearer tokens that protect the account and
//! order routes. Tokens carry the user id and email and are signed
//! with the server's `JWT_SECRET`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

/// Sessions stay valid for 7 days.
const JWT_EXPIRY_HOURS: i64 = 168;

/// Claims embedded in a user session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserClaims {
    /// User id, stringified.
    pub sub: String,
    /// User email at issue time.
    pub email: String,
    /// Expiration, seconds since the Unix epoch.
    pub exp: usize,
    /// Issued at, seconds since the Unix epoch.
    pub iat: usize,
}

/// Verified identity attached to the request after authentication.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
}

/// Sign a session token for a user.
pub fn create_token(
    user_id: i64,
    email: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = UserClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Middleware guarding routes that require a logged-in user.
///
/// Expects `Authorization: Bearer <token>`. On success an [`AuthUser`]
/// extension is attached to the request.
pub async fn user_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("No token provided"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization format"))?;

    let token_data = decode::<UserClaims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        invalid_token()
    })?;

    let user_id: i64 = token_data
        .claims
        .sub
        .parse()
        .map_err(|_| invalid_token())?;

    request.extensions_mut().insert(AuthUser {
        id: user_id,
        email: token_data.claims.email,
    });

    Ok(next.run(request).await)
}

fn unauthorized(message: &str) -> Response {
    AppError::with_message(ErrorCode::NotAuthenticated, message).into_response()
}

fn invalid_token() -> Response {
    AppError::with_message(ErrorCode::TokenInvalid, "Invalid or expired token").into_response()
}
