//! Auth Config

use std::time::Duration;

use clap::Args;

use storefront_app::auth::JwtSettings;

/// Bearer token verification settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// HMAC secret shared with the token issuer
    #[arg(long, env = "JWT_SECRET_KEY", hide_env_values = true)]
    pub jwt_secret_key: String,

    /// Required `iss` claim
    #[arg(long, env = "JWT_ISSUER")]
    pub jwt_issuer: Option<String>,

    /// Required `aud` claim
    #[arg(long, env = "JWT_AUDIENCE")]
    pub jwt_audience: Option<String>,

    /// Clock skew tolerated on `exp`, in seconds
    #[arg(long, env = "JWT_LEEWAY_SECONDS", default_value_t = 30_u64)]
    pub jwt_leeway_seconds: u64,
}

impl AuthConfig {
    #[must_use]
    pub fn jwt_settings(&self) -> JwtSettings {
        JwtSettings {
            secret: self.jwt_secret_key.clone(),
            issuer: self.jwt_issuer.clone(),
            audience: self.jwt_audience.clone(),
            leeway: Duration::from_secs(self.jwt_leeway_seconds),
        }
    }
}
