use std::sync::{Arc, Mutex, MutexGuard};

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use rand_core::OsRng;
use tracing::info;

use recado_core::{CoreError, Network};
use recado_db::Database;
use recado_types::api::{Claims, CreateUserRequest, CreateUserResponse, OpenSessionRequest, SessionResponse};

use crate::error::ApiError;

/// Session tokens stay valid for 30 days.
const SESSION_DAYS: i64 = 30;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    /// Every core operation runs under this single lock.
    pub network: Mutex<Network>,
    pub db: Database,
    pub jwt_secret: String,
    /// Required by the `/system` routes; they are disabled when unset.
    pub admin_token: Option<String>,
}

impl AppStateInner {
    pub fn new(network: Network, db: Database, jwt_secret: String, admin_token: Option<String>) -> AppState {
        Arc::new(Self {
            network: Mutex::new(network),
            db,
            jwt_secret,
            admin_token,
        })
    }

    pub fn network(&self) -> Result<MutexGuard<'_, Network>, ApiError> {
        self.network
            .lock()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("network lock poisoned: {}", e)))
    }
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.password.is_empty() {
        return Err(CoreError::InvalidPassword.into());
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
        .to_string();

    state
        .network()?
        .create_user(&req.login, &password_hash, &req.name)?;
    info!("Created account {}", req.login);

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse { login: req.login }),
    ))
}

pub async fn open_session(
    State(state): State<AppState>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (password_hash, joined) = state
        .network()?
        .profile(&req.login)
        .map(|p| (p.password_hash.clone(), p.created_at.timestamp_micros()))
        .map_err(|_| ApiError::BadCredentials)?;

    let parsed_hash = PasswordHash::new(&password_hash)
        .map_err(|e| anyhow::anyhow!("stored hash for {} is corrupt: {}", req.login, e))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::BadCredentials)?;

    let token = create_token(&state.jwt_secret, &req.login, joined)?;

    Ok(Json(SessionResponse {
        login: req.login,
        token,
    }))
}

fn create_token(secret: &str, login: &str, joined: i64) -> anyhow::Result<String> {
    let claims = Claims {
        sub: login.to_string(),
        joined,
        exp: (chrono::Utc::now() + chrono::Duration::days(SESSION_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
