//! Shared application state

use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;

use crate::auth::rate_limit::RateLimiter;
use crate::config::Config;
use crate::email::Mailer;
use crate::stripe::Gateway;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything a handler needs, cloned per request by axum
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub mailer: Mailer,
    pub gateway: Gateway,
    /// Verifies incoming webhook signatures
    pub stripe_webhook_secret: String,
    /// Signs and verifies user session tokens
    pub jwt_secret: String,
    /// Base URL the gateway redirects shoppers back to
    pub frontend_base_url: String,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Connect storage, run pending migrations and wire the outbound clients
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        let ses = ses_client().await;

        Ok(Self {
            pool,
            mailer: Mailer::new(ses, config.ses_from_email.clone()),
            gateway: Gateway::new(config.stripe_secret_key.clone(), config.gateway_timeout_secs),
            stripe_webhook_secret: config.stripe_webhook_secret.clone(),
            jwt_secret: config.jwt_secret.clone(),
            frontend_base_url: config.frontend_base_url.clone(),
            rate_limiter: RateLimiter::new(),
        })
    }
}

/// SES client from ambient AWS credentials. `SES_REGION` overrides the
/// region when SES lives somewhere other than the rest of the stack.
async fn ses_client() -> SesClient {
    let base = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    match std::env::var("SES_REGION") {
        Ok(region) => {
            let with_region = base
                .to_builder()
                .region(aws_config::Region::new(region))
                .build();
            SesClient::new(&with_region)
        }
        Err(_) => SesClient::new(&base),
    }
}
