use std::path::PathBuf;

/// Secrets that must never reach production.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub admin_token: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("RECADO_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("RECADO_PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()?;
        let db_path: PathBuf = std::env::var("RECADO_DB_PATH")
            .unwrap_or_else(|_| "recado.db".into())
            .into();
        let jwt_secret =
            std::env::var("RECADO_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
        let admin_token = std::env::var("RECADO_ADMIN_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        Ok(Self {
            host,
            port,
            db_path,
            jwt_secret,
            admin_token,
        })
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&self.jwt_secret.as_str())
    }
}
