use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use recado_core::FriendRequest;
use recado_types::api::{Claims, FriendRequestResponse, FriendRequestStatus, RelationStatus, UserListResponse};

use crate::auth::AppState;
use crate::error::ApiError;

fn relation_status(login: String, related: bool) -> Json<RelationStatus> {
    Json(RelationStatus { login, related })
}

fn user_list(users: Vec<String>) -> Json<UserListResponse> {
    Json(UserListResponse { users })
}

// -- Friends --

/// POST /friends/{login}: invite, or accept the invite `login` already sent.
pub async fn request_friend(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.network()?.request_friend(&claims.sub, &login)?;
    let status = match outcome {
        FriendRequest::Invited => FriendRequestStatus::Invited,
        FriendRequest::Accepted => FriendRequestStatus::Accepted,
    };
    Ok(Json(FriendRequestResponse { status }))
}

pub async fn is_friend(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let related = state.network()?.is_friend(&claims.sub, &login);
    Ok(relation_status(login, related))
}

pub async fn list_friends(
    State(state): State<AppState>,
    Path(login): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(user_list(state.network()?.friends(&login)?))
}

// -- Fans and idols --

pub async fn add_idol(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    state.network()?.add_idol(&claims.sub, &login)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn is_fan(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let related = state.network()?.is_fan(&claims.sub, &login);
    Ok(relation_status(login, related))
}

pub async fn list_fans(
    State(state): State<AppState>,
    Path(login): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(user_list(state.network()?.fans(&login)?))
}

pub async fn list_idols(
    State(state): State<AppState>,
    Path(login): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(user_list(state.network()?.idols(&login)?))
}

// -- Crushes --

pub async fn add_crush(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    state.network()?.add_crush(&claims.sub, &login)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn is_crush(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let related = state.network()?.is_crush(&claims.sub, &login);
    Ok(relation_status(login, related))
}

/// GET /crushes: crushes are private, so only the owner can list them.
pub async fn list_crushes(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(user_list(state.network()?.crushes(&claims.sub)?))
}

// -- Enemies --

pub async fn add_enemy(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    state.network()?.add_enemy(&claims.sub, &login)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn is_enemy(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let related = state.network()?.is_enemy(&claims.sub, &login);
    Ok(relation_status(login, related))
}
