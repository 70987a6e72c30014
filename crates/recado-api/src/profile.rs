use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use recado_types::api::{AttributeResponse, Claims, EditAttributeRequest};

use crate::auth::AppState;
use crate::error::ApiError;

/// GET /users/{login}/attributes/{key}
pub async fn get_attribute(
    State(state): State<AppState>,
    Path((login, key)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let value = state.network()?.attribute(&login, &key)?;
    Ok(Json(AttributeResponse { key, value }))
}

/// PUT /profile/{key}
pub async fn edit_profile(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<EditAttributeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.network()?.edit_profile(&claims.sub, &key, &req.value)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/me
pub async fn remove_account(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let mut network = state.network()?;
    // Removal itself never fails; a stale token must not silently succeed.
    network.profile(&claims.sub)?;
    network.remove_user(&claims.sub);
    info!("Account {} removed", claims.sub);
    Ok(StatusCode::NO_CONTENT)
}
