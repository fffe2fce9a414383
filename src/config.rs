//! Configuration management

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub ga: GaConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path, created on first start if absent
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// The single web origin allowed to call the tracking and config endpoints
    pub allowed_origin: String,
}

/// Google Analytics values served by the config gate. Passed through as-is;
/// absent values surface as null in the response.
#[derive(Debug, Clone, Deserialize)]
pub struct GaConfig {
    #[serde(default)]
    pub measurement_id: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("database.url", "views.db")?
            .set_default("cors.allowed_origin", "https://2xwh.pages.dev")?
            .add_source(config::File::with_name("viewtrack").required(false))
            .add_source(config::Environment::with_prefix("VIEWTRACK").separator("__"))
            // The deployment environment uses these unprefixed names
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("ga.measurement_id", std::env::var("GA_MEASUREMENT_ID").ok())?
            .set_override_option("ga.api_secret", std::env::var("GA_API_SECRET").ok())?;

        let settings = builder.build()?;
        let config: Config = settings.try_deserialize()?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Invalid port: 0 is not allowed");
        }
        if self.server.host.is_empty() {
            anyhow::bail!("Server host cannot be empty");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        // The allowed origin must be a valid header value for the CORS layer
        let origin = &self.cors.allowed_origin;
        if origin.is_empty() {
            anyhow::bail!("Allowed origin cannot be empty");
        }
        if origin.parse::<axum::http::HeaderValue>().is_err() {
            anyhow::bail!("Invalid allowed origin '{}'", origin);
        }

        Ok(())
    }
}
