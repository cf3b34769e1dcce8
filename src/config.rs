use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

/// Fallback signing secret for local runs. Refused when `APP_ENV=production`.
pub const INSECURE_DEV_SECRET: &str = "insecure-dev-secret-change-me";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Json,
    Postgres,
    Memory,
}

/// How strictly `amount` (and `date`) are checked on create/update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountPolicy {
    /// Any present value is accepted; non-numeric input becomes `0.0`.
    #[default]
    Permissive,
    /// Amount must be a finite number and date a real `YYYY-MM-DD` day.
    Strict,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub production: bool,
    pub jwt: JwtConfig,
    pub storage: StorageBackend,
    pub data_dir: PathBuf,
    pub database_url: Option<String>,
    pub amount_policy: AmountPolicy,
    pub seed_demo: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ if production => anyhow::bail!("JWT_SECRET must be set when APP_ENV=production"),
            _ => {
                warn!("JWT_SECRET not set; using an insecure development secret");
                INSECURE_DEV_SECRET.to_string()
            }
        };
        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "spendwise".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "spendwise-users".into()),
        };

        let port = match std::env::var("APP_PORT") {
            Ok(v) => v.parse::<u16>().context("APP_PORT must be a port number")?,
            Err(_) => 3008,
        };

        let storage = parse_backend(
            &std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "json".into()),
        )?;
        let database_url = std::env::var("DATABASE_URL").ok();
        if storage == StorageBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL is required for the postgres storage backend");
        }

        let amount_policy = parse_amount_policy(
            &std::env::var("AMOUNT_POLICY").unwrap_or_else(|_| "permissive".into()),
        )?;

        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            production,
            jwt,
            storage,
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            database_url,
            amount_policy,
            seed_demo: std::env::var("SEED_DEMO")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }

    /// In-memory configuration with a fixed secret, for tests and throwaway runs.
    pub fn ephemeral() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            production: false,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
            },
            storage: StorageBackend::Memory,
            data_dir: PathBuf::from("data"),
            database_url: None,
            amount_policy: AmountPolicy::Permissive,
            seed_demo: false,
        }
    }
}

fn parse_backend(raw: &str) -> anyhow::Result<StorageBackend> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "json" | "file" => Ok(StorageBackend::Json),
        "postgres" | "pg" => Ok(StorageBackend::Postgres),
        "memory" => Ok(StorageBackend::Memory),
        other => anyhow::bail!("unknown STORAGE_BACKEND {other:?}"),
    }
}

fn parse_amount_policy(raw: &str) -> anyhow::Result<AmountPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "permissive" => Ok(AmountPolicy::Permissive),
        "strict" => Ok(AmountPolicy::Strict),
        other => anyhow::bail!("unknown AMOUNT_POLICY {other:?}"),
    }
}
