//! Environment-driven server configuration
//!
//! Everything comes from env vars (a local `.env` works via dotenvy).
//! Secrets have development fallbacks so a fresh checkout runs, but refuse
//! to start outside development.

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL, required
    pub database_url: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    /// Signs user session tokens
    pub jwt_secret: String,
    pub stripe_secret_key: String,
    /// Verifies webhook signatures
    pub stripe_webhook_secret: String,
    /// Where the gateway sends the shopper after checkout
    pub frontend_base_url: String,
    pub ses_from_email: String,
    /// Timeout for outbound gateway calls, seconds
    pub gateway_timeout_secs: u64,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Secret env var. Missing or empty values get a placeholder in
/// development and abort startup everywhere else.
fn secret(name: &str, environment: &str) -> Result<String, BoxError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ if environment == "development" => Ok(format!("dev-{name}-not-for-production")),
        _ => Err(format!("{name} must be set in the {environment} environment").into()),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = env_or("ENVIRONMENT", "development");

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            jwt_secret: secret("JWT_SECRET", &environment)?,
            stripe_secret_key: secret("STRIPE_SECRET_KEY", &environment)?,
            stripe_webhook_secret: secret("STRIPE_WEBHOOK_SECRET", &environment)?,
            frontend_base_url: env_or("FRONTEND_BASE_URL", "http://localhost:3000"),
            ses_from_email: env_or("SES_FROM_EMAIL", "noreply@bookhub.app"),
            gateway_timeout_secs: std::env::var("GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            environment,
        })
    }
}
