use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_sprint_secs")]
    pub sprint_secs: u64,
    #[serde(default = "default_operation")]
    pub operation: String,
    #[serde(default = "default_digits")]
    pub digits: u8,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_locale() -> String {
    "en".to_string()
}
fn default_sound_enabled() -> bool {
    true
}
fn default_question_count() -> usize {
    20
}
fn default_sprint_secs() -> u64 {
    60
}
fn default_operation() -> String {
    "addition".to_string()
}
fn default_digits() -> u8 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            locale: default_locale(),
            sound_enabled: default_sound_enabled(),
            question_count: default_question_count(),
            sprint_secs: default_sprint_secs(),
            operation: default_operation(),
            digits: default_digits(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mathdr")
            .join("config.toml")
    }

    /// Clamp out-of-range values and reset unknown keys after deserialization,
    /// so a hand-edited or stale config file cannot wedge the app.
    pub fn validate(&mut self, valid_operations: &[&str]) {
        self.question_count = self.question_count.clamp(5, 100);
        self.sprint_secs = self.sprint_secs.clamp(15, 300);
        self.digits = self.digits.clamp(1, 3);
        if !valid_operations.contains(&self.operation.as_str()) {
            self.operation = default_operation();
        }
        if self.locale != "en" && self.locale != "de" {
            self.locale = default_locale();
        }
    }
}
