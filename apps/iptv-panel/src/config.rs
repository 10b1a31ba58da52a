use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://iptv.db";
/// Front-end shipped with the crate; `PUBLIC_DIR` overrides it for deployments
/// that move the binary away from the source tree.
pub const DEFAULT_PUBLIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/public");
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Everything the server needs, read once at startup and owned by the process.
#[derive(Clone)]
pub struct PanelConfig {
    pub port: u16,
    pub database_url: String,
    /// HS256 signing key. `None` means a random per-process key is generated.
    pub jwt_secret: Option<String>,
    pub bcrypt_cost: u32,
    pub telegram: Option<TelegramConfig>,
    pub public_dir: PathBuf,
    pub log_dir: PathBuf,
}

#[derive(Clone)]
pub struct TelegramConfig {
    pub api_url: String,
    pub bot_token: String,
    pub chat_id: String,
}

impl PanelConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a number, got '{raw}'"))?,
            None => DEFAULT_PORT,
        };

        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("BCRYPT_COST must be a number, got '{raw}'"))?,
            None => bcrypt::DEFAULT_COST,
        };

        let telegram = match (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig {
                api_url: get("TELEGRAM_API_URL")
                    .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
                bot_token,
                chat_id,
            }),
            _ => None,
        };

        Ok(Self {
            port,
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret: get("JWT_SECRET"),
            bcrypt_cost,
            telegram,
            public_dir: get("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR)),
            log_dir: get("LOG_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
        })
    }
}

impl fmt::Debug for PanelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelConfig")
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("telegram", &self.telegram)
            .field("public_dir", &self.public_dir)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_url", &self.api_url)
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<PanelConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PanelConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(config.jwt_secret.is_none());
        assert!(config.telegram.is_none());
    }

    #[test]
    fn default_public_dir_does_not_depend_on_working_directory() {
        let config = config_from(&[]).unwrap();
        assert!(config.public_dir.is_absolute());
        assert!(config.public_dir.join("login.html").is_file());

        let config = config_from(&[("PUBLIC_DIR", "/srv/panel")]).unwrap();
        assert_eq!(config.public_dir, PathBuf::from("/srv/panel"));
    }

    #[test]
    fn port_is_overridable() {
        let config = config_from(&[("PORT", "8081")]).unwrap();
        assert_eq!(config.port, 8081);
        assert!(config_from(&[("PORT", "http")]).is_err());
    }

    #[test]
    fn telegram_needs_both_token_and_chat() {
        assert!(config_from(&[("TELEGRAM_BOT_TOKEN", "t")]).unwrap().telegram.is_none());

        let config = config_from(&[("TELEGRAM_BOT_TOKEN", "t"), ("TELEGRAM_CHAT_ID", "42")]).unwrap();
        let telegram = config.telegram.unwrap();
        assert_eq!(telegram.chat_id, "42");
        assert_eq!(telegram.api_url, DEFAULT_TELEGRAM_API_URL);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = config_from(&[
            ("JWT_SECRET", "hunter2"),
            ("TELEGRAM_BOT_TOKEN", "bot-secret"),
            ("TELEGRAM_CHAT_ID", "42"),
        ])
        .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("bot-secret"));
    }
}
