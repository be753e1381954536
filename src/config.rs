use regex::Regex;
use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::subscription::DEFAULT_GATE_TIMEOUT_SECS;
use crate::translator::DEFAULT_TRANSLATE_TIMEOUT_SECS;

pub const DEFAULT_CHANNEL_USERNAME: &str = "Traveler_01";
pub const DEFAULT_LIVENESS_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} environment variable is required", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    /// channel users must join, stored without the leading '@'
    pub channel_username: String,
    pub liveness_port: u16,
    pub gate_timeout: Duration,
    pub translate_timeout: Duration,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"***")
            .field("channel_username", &self.channel_username)
            .field("liveness_port", &self.liveness_port)
            .field("gate_timeout", &self.gate_timeout)
            .field("translate_timeout", &self.translate_timeout)
            .finish()
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// builds the config from any key -> value source; `from_env` uses the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("BOT_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let channel_username = match lookup("CHANNEL_USERNAME") {
            Some(raw) => Self::normalize_channel(&raw).ok_or(ConfigError::Invalid {
                key: "CHANNEL_USERNAME",
                value: raw,
            })?,
            None => DEFAULT_CHANNEL_USERNAME.to_string(),
        };

        let liveness_port = Self::parse_or("LIVENESS_PORT", &lookup, DEFAULT_LIVENESS_PORT)?;
        let gate_timeout_secs: u64 =
            Self::parse_or("GATE_TIMEOUT_SECS", &lookup, DEFAULT_GATE_TIMEOUT_SECS)?;
        let translate_timeout_secs: u64 = Self::parse_or(
            "TRANSLATE_TIMEOUT_SECS",
            &lookup,
            DEFAULT_TRANSLATE_TIMEOUT_SECS,
        )?;

        Ok(Self {
            bot_token,
            channel_username,
            liveness_port,
            gate_timeout: Duration::from_secs(gate_timeout_secs),
            translate_timeout: Duration::from_secs(translate_timeout_secs),
        })
    }

    fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        F: Fn(&str) -> Option<String>,
    {
        match lookup(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value: raw }),
            None => Ok(default),
        }
    }

    /// accepts "name", "@name" or a t.me link; returns the bare username
    fn normalize_channel(raw: &str) -> Option<String> {
        // telegram usernames: 5-32 chars, alphanumeric and underscore
        let channel_regex =
            Regex::new(r"^(?:@|(?:https?://)?t\.me/)?([a-zA-Z0-9_]{5,32})$").ok()?;
        channel_regex
            .captures(raw.trim())
            .map(|captures| captures[1].to_string())
    }
}
