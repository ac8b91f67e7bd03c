//! Bearer-token authentication for Axum handlers.
//!
//! Tokens are issued by an external identity provider; this module only
//! verifies them (HS256, shared secret) and extracts the caller identity.
//! With `AUTH_OPTIONAL=true`, requests without an `Authorization` header
//! run as a fixed development user instead of being rejected.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use docforge_core::error::CoreError;

use crate::config::AuthConfig;
use crate::error::AppError;
use crate::state::AppState;

/// User id assumed for header-less requests when auth is optional.
pub const DEV_USER_ID: &str = "dev-user";

/// JWT claims expected in an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject -- the user id issued by the identity provider.
    pub sub: String,
    /// The user's email address, when the provider includes it.
    #[serde(default)]
    pub email: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_token(
    token: &str,
    config: &AuthConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user id (from `claims.sub`).
    pub user_id: String,
    /// The user's email, when present in the token.
    pub email: Option<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok());

        let Some(auth_header) = auth_header else {
            if state.config.auth.auth_optional {
                return Ok(AuthUser {
                    user_id: DEV_USER_ID.to_string(),
                    email: None,
                });
            }
            return Err(AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            )));
        };

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.auth).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}
