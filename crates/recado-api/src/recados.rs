use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use recado_types::api::{Claims, ReadMessageResponse, SendMessageRequest};

use crate::auth::AppState;
use crate::error::ApiError;

/// POST /recados/{login}
pub async fn send_recado(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.network()?.send_recado(&claims.sub, &login, &req.content)?;
    Ok(StatusCode::CREATED)
}

/// POST /inbox/recados/next: consumes the oldest unread recado.
pub async fn read_recado(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state.network()?.read_recado(&claims.sub)?;
    Ok(Json(ReadMessageResponse { message }))
}
