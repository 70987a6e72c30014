use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use recado_core::CoreError;
use recado_types::api::ErrorResponse;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("missing or invalid session token")]
    Unauthorized,

    #[error("invalid login or password")]
    BadCredentials,

    #[error("admin token required")]
    Forbidden,

    #[error("internal error")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Core(err) => core_status(err),
            Self::Unauthorized | Self::BadCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn core_status(err: &CoreError) -> StatusCode {
    use CoreError::*;
    match err {
        SelfReference(_) | InvalidLogin | InvalidPassword | InvalidCommunityName
        | ReadOnlyAttribute(_) => StatusCode::BAD_REQUEST,
        UnknownUser(_) | UnknownCommunity(_) | AttributeNotSet(_) | NoMessage(_)
        | NotMember { .. } => StatusCode::NOT_FOUND,
        BlockedByEnemy(_) => StatusCode::FORBIDDEN,
        DuplicateInvite(_) | AlreadyFriends(_) | Duplicate { .. } | UserExists(_)
        | CommunityExists(_) | AlreadyMember { .. } | OwnerCannotLeave(_) => StatusCode::CONFLICT,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(err) = &self {
            error!("Internal error: {:#}", err);
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
