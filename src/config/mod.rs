use std::env;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_PORT: u16 = 3001;

pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub admin: AdminCredentials,
}

/// The single recognized administrator identity. The credential pair is
/// supplied by the environment, never a literal in code.
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/eventide".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            admin: AdminCredentials::from_env(),
        }
    }
}

impl AdminCredentials {
    pub fn from_env() -> Self {
        Self {
            username: env::var("ADMIN_USERNAME").expect("ADMIN_USERNAME must be set"),
            password: env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD must be set"),
            email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string()),
            first_name: env::var("ADMIN_FIRST_NAME").unwrap_or_else(|_| "Site".to_string()),
            last_name: env::var("ADMIN_LAST_NAME").unwrap_or_else(|_| "Admin".to_string()),
        }
    }
}
