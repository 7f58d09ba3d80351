use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::scoring;
use crate::session::controller::SessionSettings;
use crate::source::local::DEFAULT_SESSION_SIZE;

/// Game server login, sent to `POST /api/login`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary_id: Option<u64>,
    #[serde(default = "default_session_size")]
    pub session_size: usize,
    #[serde(default = "default_base_score")]
    pub base_score: u64,
    #[serde(default = "default_combo_bonus")]
    pub combo_bonus: u64,
    #[serde(default = "default_easy_mask_ratio")]
    pub easy_mask_ratio: f64,
    #[serde(default = "default_hard_mask_ratio")]
    pub hard_mask_ratio: f64,
    #[serde(default = "default_success_delay_ms")]
    pub success_delay_ms: u64,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_hazard_secs")]
    pub hazard_secs: u64,
    #[serde(default = "default_reward_display_ms")]
    pub reward_display_ms: u64,
    #[serde(default = "default_speech_enabled")]
    pub speech_enabled: bool,
    #[serde(default = "default_speech_command")]
    pub speech_command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_session_size() -> usize {
    DEFAULT_SESSION_SIZE
}
fn default_base_score() -> u64 {
    scoring::BASE_SCORE
}
fn default_combo_bonus() -> u64 {
    scoring::COMBO_BONUS
}
fn default_easy_mask_ratio() -> f64 {
    0.35
}
fn default_hard_mask_ratio() -> f64 {
    0.70
}
fn default_success_delay_ms() -> u64 {
    2500
}
fn default_retry_delay_ms() -> u64 {
    2000
}
fn default_hazard_secs() -> u64 {
    5
}
fn default_reward_display_ms() -> u64 {
    1500
}
fn default_speech_enabled() -> bool {
    true
}
fn default_speech_command() -> String {
    crate::speech::default_command().to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            dictionary_id: None,
            session_size: default_session_size(),
            base_score: default_base_score(),
            combo_bonus: default_combo_bonus(),
            easy_mask_ratio: default_easy_mask_ratio(),
            hard_mask_ratio: default_hard_mask_ratio(),
            success_delay_ms: default_success_delay_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            hazard_secs: default_hazard_secs(),
            reward_display_ms: default_reward_display_ms(),
            speech_enabled: default_speech_enabled(),
            speech_command: default_speech_command(),
            server_url: None,
            user_id: None,
            username: None,
            password: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordfall")
            .join("config.toml")
    }

    /// Clamp hand-edited values back into playable ranges.
    pub fn normalize(&mut self) {
        if self.session_size == 0 {
            self.session_size = default_session_size();
        }
        if !(0.0..=1.0).contains(&self.easy_mask_ratio) {
            self.easy_mask_ratio = default_easy_mask_ratio();
        }
        if !(0.0..=1.0).contains(&self.hard_mask_ratio) {
            self.hard_mask_ratio = default_hard_mask_ratio();
        }
        if self.hard_mask_ratio < self.easy_mask_ratio {
            self.hard_mask_ratio = self.easy_mask_ratio;
        }
        if self.hazard_secs == 0 {
            self.hazard_secs = default_hazard_secs();
        }
        if self.speech_command.trim().is_empty() {
            self.speech_command = default_speech_command();
        }
        if self
            .server_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            self.server_url = None;
        }
        if self
            .username
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            self.username = None;
        }
    }

    /// A missing password is sent as empty.
    pub fn credentials(&self) -> Option<Credentials> {
        self.username.as_ref().map(|username| Credentials {
            username: username.clone(),
            password: self.password.clone().unwrap_or_default(),
        })
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            base_score: self.base_score,
            combo_bonus: self.combo_bonus,
            easy_mask_ratio: self.easy_mask_ratio,
            hard_mask_ratio: self.hard_mask_ratio,
            success_delay: Duration::from_millis(self.success_delay_ms),
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            hazard_duration: Duration::from_secs(self.hazard_secs),
            reward_duration: Duration::from_millis(self.reward_display_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.session_size, 10);
        assert_eq!(config.base_score, 100);
        assert_eq!(config.combo_bonus, 10);
        assert_eq!(config.hazard_secs, 5);
        assert!(config.server_url.is_none());
        assert!(config.dictionary_id.is_none());
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
theme = "gruvbox-dark"
dictionary_id = 2
server_url = "http://localhost:8080"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "gruvbox-dark");
        assert_eq!(config.dictionary_id, Some(2));
        assert_eq!(config.server_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.success_delay_ms, 2500);
        assert_eq!(config.retry_delay_ms, 2000);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.user_id = Some(7);
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.user_id, Some(7));
        assert_eq!(deserialized.server_url, None);
        assert_eq!(deserialized.speech_command, config.speech_command);
    }

    #[test]
    fn test_normalize_repairs_out_of_range_values() {
        let mut config = Config::default();
        config.session_size = 0;
        config.easy_mask_ratio = 1.5;
        config.hard_mask_ratio = 0.1;
        config.hazard_secs = 0;
        config.server_url = Some("  ".to_string());
        config.normalize();
        assert_eq!(config.session_size, 10);
        assert_eq!(config.easy_mask_ratio, 0.35);
        assert_eq!(config.hard_mask_ratio, 0.35);
        assert_eq!(config.hazard_secs, 5);
        assert!(config.server_url.is_none());
    }

    #[test]
    fn test_credentials_need_a_username() {
        let mut config: Config = toml::from_str(r#"password = "secret""#).unwrap();
        assert!(config.credentials().is_none());

        config.username = Some("ana".to_string());
        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.username, "ana");
        assert_eq!(credentials.password, "secret");

        config.username = Some(" ".to_string());
        config.normalize();
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_save_to_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        assert_eq!(Config::load_from(&path).unwrap().session_size, 10);

        let mut config = Config::default();
        config.dictionary_id = Some(4);
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().dictionary_id, Some(4));
    }

    #[test]
    fn test_session_settings_match_defaults() {
        let settings = Config::default().session_settings();
        let defaults = SessionSettings::default();
        assert_eq!(settings.base_score, defaults.base_score);
        assert_eq!(settings.success_delay, defaults.success_delay);
        assert_eq!(settings.retry_delay, defaults.retry_delay);
        assert_eq!(settings.hazard_duration, defaults.hazard_duration);
        assert_eq!(settings.reward_duration, defaults.reward_duration);
    }
}
