//! Configuration management
//!
//! Reads `settings.json` from the application directory:
//! ```json
//! {
//!   "throttle": {
//!     "login": { "limit": 5, "lockoutMinutes": 30 },
//!     "banking": { "limit": 3 }
//!   }
//! }
//! ```
//! A missing `lockoutMinutes` means the lockout never expires on its own.

use std::path::Path;

use anyhow::Result;
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::services::ThrottlePolicy;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    throttle: ThrottleSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThrottleSection {
    #[serde(default = "ThrottleSettings::login_default")]
    login: ThrottleSettings,
    #[serde(default = "ThrottleSettings::banking_default")]
    banking: ThrottleSettings,
}

impl Default for ThrottleSection {
    fn default() -> Self {
        Self {
            login: ThrottleSettings::login_default(),
            banking: ThrottleSettings::banking_default(),
        }
    }
}

/// Limits for one throttled path as stored in settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleSettings {
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lockout_minutes: Option<i64>,
}

impl ThrottleSettings {
    fn login_default() -> Self {
        Self {
            limit: 5,
            lockout_minutes: Some(30),
        }
    }

    fn banking_default() -> Self {
        Self {
            limit: 3,
            lockout_minutes: None,
        }
    }

    pub fn policy(&self) -> ThrottlePolicy {
        ThrottlePolicy {
            limit: self.limit,
            lockout: self.lockout_minutes.map(Duration::minutes),
        }
    }
}

/// Ledger configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub login_throttle: ThrottleSettings,
    pub banking_throttle: ThrottleSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            login_throttle: ThrottleSettings::login_default(),
            banking_throttle: ThrottleSettings::banking_default(),
        }
    }
}

impl Config {
    /// Load config from the application directory. A missing or malformed
    /// settings file falls back to the defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        let settings_path = dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        Ok(Self {
            login_throttle: raw.throttle.login,
            banking_throttle: raw.throttle.banking,
        })
    }

    /// Save the managed settings back to the directory
    pub fn save(&self, dir: &Path) -> Result<()> {
        let settings = SettingsFile {
            throttle: ThrottleSection {
                login: self.login_throttle.clone(),
                banking: self.banking_throttle.clone(),
            },
        };
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(dir.join("settings.json"), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config.login_throttle.limit, 5);
        assert_eq!(config.login_throttle.lockout_minutes, Some(30));
        assert_eq!(config.banking_throttle.limit, 3);
        assert_eq!(config.banking_throttle.lockout_minutes, None);
    }

    #[test]
    fn test_load_overrides_from_file() {
        let dir = tempdir().unwrap();
        let content = r#"{
            "throttle": {
                "login": { "limit": 7, "lockoutMinutes": 10 },
                "banking": { "limit": 2 }
            }
        }"#;
        std::fs::write(dir.path().join("settings.json"), content).unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.login_throttle.limit, 7);
        assert_eq!(config.login_throttle.lockout_minutes, Some(10));
        assert_eq!(config.banking_throttle.limit, 2);
        assert_eq!(config.banking_throttle.lockout_minutes, None);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.login_throttle.limit, 5);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.banking_throttle.lockout_minutes = Some(60);
        config.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.banking_throttle, config.banking_throttle);
    }

    #[test]
    fn test_policy_conversion() {
        let settings = ThrottleSettings {
            limit: 4,
            lockout_minutes: Some(15),
        };
        let policy = settings.policy();
        assert_eq!(policy.limit, 4);
        assert_eq!(policy.lockout, Some(Duration::minutes(15)));

        let settings = ThrottleSettings {
            limit: 3,
            lockout_minutes: None,
        };
        assert!(settings.policy().lockout.is_none());
    }
}
