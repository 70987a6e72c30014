use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;

use recado_types::api::Claims;

use crate::auth::AppState;
use crate::error::ApiError;

/// Header carrying the admin token for the `/system` routes.
pub const ADMIN_HEADER: &str = "x-admin-token";

/// Resolve the bearer session token to the acting user and attach its claims.
/// Tokens issued to a deleted account stay dead even if the login is
/// registered again.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthorized)?;

    let claims = token_data.claims;
    let current = state
        .network()?
        .profile(&claims.sub)
        .map(|p| p.created_at.timestamp_micros())
        .ok();
    if current != Some(claims.joined) {
        debug!("Rejected stale session for {}", claims.sub);
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let expected = state.admin_token.as_deref().ok_or(ApiError::Forbidden)?;
    let provided = req
        .headers()
        .get(ADMIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Forbidden)?;

    if provided != expected {
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(req).await)
}
