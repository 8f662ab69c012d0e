use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::MemoError,
    persistence::{
        load_json_or_default,
        save_json,
    },
};

const SETTINGS_FILE: &str = "settings.json";

pub const API_URL_ENV: &str = "SOMEMO_API_URL";
pub const OFFLINE_CACHE_ENV: &str = "SOMEMO_OFFLINE_CACHE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Keep a local snapshot of the collection to read when the backend is down.
    pub offline_cache: bool,
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 30,
            offline_cache: false,
        }
    }
}

impl MemoConfig {
    /// Settings file from the data directory, then environment overrides.
    pub fn load() -> Self {
        let mut config: MemoConfig = load_json_or_default(SETTINGS_FILE);
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    pub fn save(&self) -> Result<(), MemoError> {
        save_json(self, SETTINGS_FILE)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(flag) = lookup(OFFLINE_CACHE_ENV) {
            match parse_flag(&flag) {
                Some(value) => self.offline_cache = value,
                None => {
                    tracing::warn!("Ignoring {}={:?}: expected true/false", OFFLINE_CACHE_ENV, flag)
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), MemoError> {
        let url = self.api_base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(MemoError::Config(format!("api_base_url must be an http(s) URL: {url}")));
        }
        if self.request_timeout_secs == 0 {
            return Err(MemoError::Config("request_timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
