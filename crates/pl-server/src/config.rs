//! API server configuration.

use serde::Deserialize;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// PostgreSQL connection URL. None selects the in-memory store.
    #[serde(default)]
    pub database_url: Option<String>,
    /// Telegram bot token. None disables the webhook and outbound replies.
    #[serde(default)]
    pub telegram_bot_token: Option<String>,
    /// Pet that chat commands are recorded against until per-chat pets
    /// are wired up.
    #[serde(default = "default_pet_id")]
    pub default_pet_id: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_pet_id() -> String {
    "demo-pet".to_string()
}

impl ServerConfig {
    /// Load config from environment variables.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);
        Self {
            port,
            database_url: std::env::var("DATABASE_URL").ok(),
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN").ok(),
            default_pet_id: std::env::var("PAWLOG_DEFAULT_PET_ID")
                .unwrap_or_else(|_| default_pet_id()),
            ..Self::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            telegram_bot_token: None,
            default_pet_id: default_pet_id(),
        }
    }
}
