use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub admin_username: String,
    pub admin_password: String,
    pub session_secret: String,
    /// Base URL used to build member edit links, e.g. "https://portal.example.org".
    pub public_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            admin_username: env::var("ADMIN_NAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PW").expect("ADMIN_PW must be set").trim().to_string(),
            session_secret: env::var("SESSION_SECRET").expect("SESSION_SECRET must be set"),
            public_base_url: env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }
}
