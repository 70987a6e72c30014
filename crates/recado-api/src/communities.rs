use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use recado_types::api::{
    Claims, CommunityListResponse, CommunityResponse, CreateCommunityRequest, ReadMessageResponse,
    SendMessageRequest,
};

use crate::auth::AppState;
use crate::error::ApiError;

/// POST /communities
pub async fn create_community(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateCommunityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .network()?
        .create_community(&claims.sub, &req.name, &req.description)?;
    Ok(StatusCode::CREATED)
}

/// GET /communities/{name}
pub async fn get_community(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let network = state.network()?;
    let community = network.community(&name)?;
    Ok(Json(CommunityResponse {
        name: community.name.clone(),
        owner: community.owner.clone(),
        description: community.description.clone(),
        members: community.members.iter().cloned().collect(),
    }))
}

/// POST /communities/{name}/members
pub async fn join_community(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    state.network()?.join_community(&claims.sub, &name)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /communities/{name}/members
pub async fn leave_community(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    state.network()?.leave_community(&claims.sub, &name)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/{login}/communities
pub async fn list_user_communities(
    State(state): State<AppState>,
    Path(login): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let communities = state.network()?.communities_of(&login)?;
    Ok(Json(CommunityListResponse { communities }))
}

/// POST /communities/{name}/messages
pub async fn send_community_message(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let delivered = state
        .network()?
        .send_community_message(&claims.sub, &name, &req.content)?;
    debug!("Community message to {} delivered to {} inboxes", name, delivered);
    Ok(StatusCode::CREATED)
}

/// POST /inbox/messages/next: consumes the oldest unread community message.
pub async fn read_community_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state.network()?.read_community_message(&claims.sub)?;
    Ok(Json(ReadMessageResponse { message }))
}
