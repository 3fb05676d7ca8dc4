use chrono_tz::Tz;
use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub debug: bool,
    pub enable_swagger: bool,
    pub port: u16,
    pub catalog_path: Option<String>,
    pub timezone: String,
    pub lead_submit_delay_ms: u64,
    pub booking_url: Url,
    pub cors_origin: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // APP_LEAD_SUBMIT_DELAY_MS -> lead_submit_delay_ms
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .set_default("timezone", "Asia/Jerusalem")?
            .set_default("lead_submit_delay_ms", 1500)?
            .set_default("booking_url", "https://app.arboxapp.com/")?
            .build()?;

        config.try_deserialize()
    }

    pub fn studio_timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| ConfigError::Message(format!("invalid timezone `{}`: {err}", self.timezone)))
    }
}
