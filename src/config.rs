use crate::utils::AppError;
use std::env;
use std::fmt;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_PAGESPEED_API_URL: &str =
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Runtime configuration read from the process environment (and `.env`).
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub access_token_secret: String,
    pub api_key: String,
    pub pagespeed_api_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &"[REDACTED]")
            .field("access_token_secret", &"[REDACTED]")
            .field("api_key", &"[REDACTED]")
            .field("pagespeed_api_url", &self.pagespeed_api_url)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| AppError::Internal(format!("{} must be set", key)))
        };

        // URL is the variable name older deployments use
        let database_url = get("DATABASE_URL")
            .or_else(|| get("URL"))
            .ok_or_else(|| AppError::Internal("DATABASE_URL must be set".to_string()))?;

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::Internal(format!("Invalid PORT '{}': {}", raw, e)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url,
            access_token_secret: require("ACCESS_TOKEN_SECRET")?,
            api_key: require("API_KEY")?,
            pagespeed_api_url: get("PAGESPEED_API_URL")
                .unwrap_or_else(|| DEFAULT_PAGESPEED_API_URL.to_string()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
