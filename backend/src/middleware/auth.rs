//! Authentication middleware
//!
//! Players sign in with the external identity provider, which issues HS256
//! bearer tokens. This middleware only verifies them and exposes the player.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// Authenticated player extracted from the bearer token
#[derive(Clone, Debug)]
pub struct Player {
    pub player_id: String,
    pub display_name: Option<String>,
    pub is_admin: bool,
}

/// Claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Player id
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Quarter authors carry `admin: true`
    #[serde(default)]
    pub admin: bool,
    pub exp: i64,
}

/// Authentication middleware that validates bearer tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header.and_then(|header| header.strip_prefix("Bearer ")) {
        Some(token) => token.trim(),
        None => {
            return AppError::Unauthorized("Missing or invalid Authorization header".to_string())
                .into_response();
        }
    };

    let claims = match decode_token(token, &state.config.auth.jwt_secret) {
        Ok(claims) => claims,
        Err(msg) => return AppError::Unauthorized(msg).into_response(),
    };

    if claims.sub.trim().is_empty() {
        return AppError::Unauthorized("Token has no subject".to_string()).into_response();
    }

    request.extensions_mut().insert(Player {
        player_id: claims.sub,
        display_name: claims.name,
        is_admin: claims.admin,
    });

    next.run(request).await
}

/// Decode and validate a bearer token
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, String> {
    use jsonwebtoken::{decode, DecodingKey, Validation};

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

/// Extractor for the authenticated player
#[derive(Clone, Debug)]
pub struct CurrentPlayer(pub Player);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentPlayer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Player>()
            .cloned()
            .map(CurrentPlayer)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// Guard for quarter authoring endpoints
pub fn require_admin(player: &Player) -> AppResult<()> {
    if player.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only quarter authors can perform this action".to_string(),
        ))
    }
}
