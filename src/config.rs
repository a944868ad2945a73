use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub google_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub google_client_id: String,
    pub frontend_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "usermgmt".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "usermgmt-users".into()),
            // Password-login tokens live 8 hours, Google-login tokens 1 day.
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 8),
            google_ttl_minutes: std::env::var("JWT_GOOGLE_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let google_client_id = std::env::var("GOOGLE_CLIENT_ID").unwrap_or_default();
        let frontend_origin = std::env::var("FRONTEND_ORIGIN").ok();
        Ok(Self {
            database_url,
            jwt,
            google_client_id,
            frontend_origin,
        })
    }
}
