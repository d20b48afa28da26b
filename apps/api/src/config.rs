use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
///
/// `groq_api_key` is deliberately optional: without it both AI generators
/// run in their "not configured" mode instead of failing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    /// Base URL objects are served from. Defaults to `{s3_endpoint}/{s3_bucket}`.
    pub s3_public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub groq_api_key: Option<String>,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    /// Country applied to new properties that do not name one.
    pub default_country: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3_endpoint = require_env("S3_ENDPOINT")?;
        let s3_bucket = require_env("S3_BUCKET")?;
        let s3_public_url = optional_env("S3_PUBLIC_URL").unwrap_or_else(|| {
            format!("{}/{}", s3_endpoint.trim_end_matches('/'), s3_bucket)
        });

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket,
            s3_endpoint,
            s3_public_url,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            groq_api_key: optional_env("GROQ_API_KEY"),
            geocoder_url: optional_env("GEOCODER_URL")
                .unwrap_or_else(|| "https://nominatim.openstreetmap.org/search".to_string()),
            geocoder_user_agent: optional_env("GEOCODER_USER_AGENT")
                .unwrap_or_else(|| format!("estate-api/{}", env!("CARGO_PKG_VERSION"))),
            default_country: optional_env("DEFAULT_COUNTRY").unwrap_or_else(|| "India".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an optional variable; unset and blank are both `None`.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
