use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_JWT_SECRET: &str = "your-secret-key";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_days: i64,
}

/// How CV routes are scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tenancy {
    /// Every CV belongs to the user that created it; CV routes require a bearer token.
    PerUser,
    /// One shared pool of CVs; CV routes are open.
    Global,
}

impl std::str::FromStr for Tenancy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_user" | "per-user" | "multi" => Ok(Tenancy::PerUser),
            "global" | "single" => Ok(Tenancy::Global),
            other => anyhow::bail!("unknown TENANCY value: {other}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub tenancy: Tenancy,
    /// Explicit CORS allow-list. Empty means permissive.
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .context("DATABASE_URL is not defined")?;

        let secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; falling back to an insecure default");
            DEFAULT_JWT_SECRET.into()
        });

        let jwt = JwtConfig {
            secret,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "cvbuilder".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "cvbuilder-users".into()),
            ttl_days: lookup("JWT_TTL_DAYS")
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
        };

        let port = lookup("PORT")
            .unwrap_or_else(|| "5002".into())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let tenancy = match lookup("TENANCY") {
            Some(v) => v.parse()?,
            None => Tenancy::PerUser,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        Ok(Self {
            database_url,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            jwt,
            tenancy,
            cors_origins,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
