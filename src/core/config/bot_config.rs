// Runtime configuration, read from the environment (a `.env` file is loaded
// first by main). Parsing goes through a lookup closure so tests can feed
// values without touching the real process environment.

use crate::core::commands::DispatchSettings;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerBackend {
    Json,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub prefix: String,
    pub xp_enabled: bool,
    pub xp_factor: u64,
    pub level_base: u64,
    pub welcome_channel_id: Option<u64>,
    pub leave_channel_id: Option<u64>,
    pub data_dir: PathBuf,
    pub ledger_backend: LedgerBackend,
    pub developer: Option<String>,
}

fn invalid(name: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason,
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Blank values count as unset
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let prefix = get("BOT_PREFIX").unwrap_or_else(|| "!".to_string());
        if prefix.chars().any(char::is_whitespace) {
            return Err(invalid("BOT_PREFIX", &prefix, "must not contain whitespace"));
        }

        let xp_enabled = match get("ENABLE_XP") {
            None => true,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                _ => return Err(invalid("ENABLE_XP", &raw, "expected true or false")),
            },
        };

        let xp_factor = match get("XP_FACTOR") {
            None => 1,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid("XP_FACTOR", &raw, "expected a non-negative integer"))?,
        };

        let level_base = match get("XP_LEVEL_BASE") {
            None => 100,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(base) if base > 0 => base,
                _ => return Err(invalid("XP_LEVEL_BASE", &raw, "expected a positive integer")),
            },
        };

        let channel = |name: &'static str| -> Result<Option<u64>, ConfigError> {
            get(name)
                .map(|raw| match raw.trim().parse::<u64>() {
                    Ok(id) if id > 0 => Ok(id),
                    _ => Err(invalid(name, &raw, "expected a channel ID")),
                })
                .transpose()
        };
        let welcome_channel_id = channel("WELCOME_CHANNEL_ID")?;
        let leave_channel_id = channel("LEAVE_CHANNEL_ID")?;

        let ledger_backend = match get("LEDGER_BACKEND") {
            None => LedgerBackend::Json,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "json" => LedgerBackend::Json,
                "sqlite" => LedgerBackend::Sqlite,
                _ => return Err(invalid("LEDGER_BACKEND", &raw, "expected json or sqlite")),
            },
        };

        Ok(Self {
            prefix,
            xp_enabled,
            xp_factor,
            level_base,
            welcome_channel_id,
            leave_channel_id,
            data_dir: get("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            ledger_backend,
            developer: get("BOT_DEVELOPER"),
        })
    }

    /// Directory holding one `_<guild_id>.json` ledger per community.
    pub fn ledger_dir(&self) -> PathBuf {
        self.data_dir.join("xp")
    }

    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("leveling.db")
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            prefix: self.prefix.clone(),
            xp_enabled: self.xp_enabled,
            xp_factor: self.xp_factor,
        }
    }
}
