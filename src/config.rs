use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::discord::api::DEFAULT_API_BASE;

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub web: WebConfig,
    pub database: DatabaseConfig,
    pub discord: DiscordConfig,
    pub gemini: GeminiConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

/// Data directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

/// Discord application credentials and endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Application ID; also serves as the OAuth client ID.
    pub application_id: String,
    /// Hex-encoded ed25519 key for interaction signature checks.
    pub public_key: String,
    pub bot_token: String,
    pub client_secret: String,
    /// Must match an OAuth redirect registered on the application.
    pub redirect_uri: String,
    pub api_base: String,
}

/// Gemini model access and mirror pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
    /// Seconds a user must wait between /ask questions.
    pub ask_cooldown_secs: u64,
    /// Retained conversation turns per user (two per exchange).
    pub chat_history_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            web: WebConfig::default(),
            database: DatabaseConfig::default(),
            discord: DiscordConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { data_dir: None }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            application_id: String::new(),
            public_key: String::new(),
            bot_token: String::new(),
            client_secret: String::new(),
            redirect_uri: "http://localhost:3000/linked-role-callback".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.0-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 30,
            ask_cooldown_secs: 10,
            chat_history_limit: 20,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/aroodes/config.toml`, then apply
    /// environment overrides. Returns defaults if the file is missing or
    /// unparseable; credentials usually arrive via the environment.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse config at {}: {e}; using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}; using defaults",
                    config_path.display()
                );
                Self::default()
            }
        };
        config.apply_env();
        config
    }

    /// Environment variables take precedence over the config file.
    fn apply_env(&mut self) {
        if let Ok(value) = std::env::var("DISCORD_APPLICATION_ID") {
            self.discord.application_id = value;
        }
        if let Ok(value) = std::env::var("DISCORD_PUBLIC_KEY") {
            self.discord.public_key = value;
        }
        if let Ok(value) = std::env::var("DISCORD_BOT_TOKEN") {
            self.discord.bot_token = value;
        }
        if let Ok(value) = std::env::var("DISCORD_CLIENT_SECRET") {
            self.discord.client_secret = value;
        }
        if let Ok(value) = std::env::var("DISCORD_REDIRECT_URI") {
            self.discord.redirect_uri = value;
        }
        if let Ok(value) = std::env::var("GEMINI_API_KEY") {
            self.gemini.api_key = value;
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                self.web.port = port;
            }
        }
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.database.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("aroodes"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("aroodes").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
