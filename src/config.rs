use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Back-office API
    pub backoffice_api_url: String,
    pub backoffice_timeout_seconds: u64,

    // Page loaders substitute sample data when the back office is unreachable
    pub fallback_data_enabled: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::parse(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // CORS
        let cors_allow_origins = parse_origins(
            &env::var("CORS_ALLOW_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );

        // Back-office API
        let backoffice_api_url =
            env::var("BACKOFFICE_API_URL").context("BACKOFFICE_API_URL must be set")?;
        url::Url::parse(&backoffice_api_url)
            .with_context(|| format!("BACKOFFICE_API_URL is not a valid URL: {backoffice_api_url}"))?;
        let backoffice_timeout_seconds = env::var("BACKOFFICE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(15);

        let fallback_data_enabled = env::var("FALLBACK_DATA_ENABLED")
            .map(|s| parse_flag(&s))
            .unwrap_or(true);

        Ok(Settings {
            env,
            server_addr,
            cors_allow_origins,
            backoffice_api_url,
            backoffice_timeout_seconds,
            fallback_data_enabled,
        })
    }

    /// Settings pointing at a given back office, used by tests and tooling.
    pub fn for_backoffice(url: &str) -> Self {
        Self {
            env: Environment::Dev,
            server_addr: "127.0.0.1:0".to_string(),
            cors_allow_origins: vec!["http://localhost:3000".to_string()],
            backoffice_api_url: url.to_string(),
            backoffice_timeout_seconds: 5,
            fallback_data_enabled: true,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
