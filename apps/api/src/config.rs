use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// S3 / MinIO settings for archiving original uploads.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Application configuration loaded from environment variables.
/// Only optional integrations are optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// PostgreSQL store when set, in-memory store otherwise.
    pub database_url: Option<String>,
    pub s3: Option<S3Config>,
    /// LLM extractor when set, keyword extractor otherwise.
    pub anthropic_api_key: Option<String>,
    pub extraction_timeout_secs: u64,
    pub max_upload_mb: usize,
    pub synonyms_path: Option<PathBuf>,
    pub seed_demo_data: bool,
    pub bonus_per_skill: f64,
    pub bonus_cap: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            database_url: None,
            s3: None,
            anthropic_api_key: None,
            extraction_timeout_secs: 30,
            max_upload_mb: 5,
            synonyms_path: None,
            seed_demo_data: false,
            bonus_per_skill: 1.0,
            bonus_cap: 10.0,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            database_url: optional_env("DATABASE_URL"),
            s3: s3_from_env()?,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            extraction_timeout_secs: parse_env(
                "EXTRACTION_TIMEOUT_SECS",
                defaults.extraction_timeout_secs,
            )?,
            max_upload_mb: parse_env("MAX_UPLOAD_MB", defaults.max_upload_mb)?,
            synonyms_path: optional_env("SKILL_SYNONYMS_PATH").map(PathBuf::from),
            seed_demo_data: parse_env("SEED_DEMO_DATA", defaults.seed_demo_data)?,
            bonus_per_skill: parse_env("MATCH_BONUS_PER_SKILL", defaults.bonus_per_skill)?,
            bonus_cap: parse_env("MATCH_BONUS_CAP", defaults.bonus_cap)?,
        })
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

/// S3 is enabled by `S3_BUCKET`; the remaining variables are then required.
fn s3_from_env() -> Result<Option<S3Config>> {
    let Some(bucket) = optional_env("S3_BUCKET") else {
        return Ok(None);
    };
    Ok(Some(S3Config {
        bucket,
        endpoint: require_env("S3_ENDPOINT")?,
        region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
        secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
    }))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} has an invalid value '{raw}'"))
}
