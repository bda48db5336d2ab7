use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::celebrate::CelebrationBackend;
use crate::theme::ThemePreset;

const DEFAULT_THEME: &str = "cyber";
const DEFAULT_CELEBRATION: &str = "both";
const DEFAULT_PLANNER_MODEL: &str = "gemini-pro";
const MIN_PLAN_TIMEOUT_MS: u64 = 1_000;
const MAX_PLAN_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_PLAN_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: String,
    pub celebration: String,
    pub planner_model: String,
    pub plan_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            celebration: DEFAULT_CELEBRATION.to_string(),
            planner_model: DEFAULT_PLANNER_MODEL.to_string(),
            plan_timeout_ms: DEFAULT_PLAN_TIMEOUT_MS,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("cyber-tasker");
        path.push("settings.toml");
        Some(path)
    }

    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        Self::load_from_path(&path)
    }

    fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(mut settings) => {
                    settings.validate();
                    settings
                }
                Err(error) => {
                    warn!(
                        "failed to parse settings config '{}': {}",
                        path.display(),
                        error
                    );
                    Self::default()
                }
            },
            Err(error) => {
                warn!(
                    "failed to read settings config '{}': {}",
                    path.display(),
                    error
                );
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path().ok_or_else(|| anyhow!("unable to determine config path"))?;
        self.save_to_path(&path)
    }

    fn save_to_path(&self, path: &Path) -> anyhow::Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("invalid settings config path"))?;
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory '{}'", parent.display()))?;

        let mut validated = self.clone();
        validated.validate();
        let contents =
            toml::to_string_pretty(&validated).context("failed to serialize settings to TOML")?;

        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow!("invalid settings config file name"))?
            .to_string_lossy()
            .to_string();
        let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

        fs::write(&tmp_path, contents).with_context(|| {
            format!(
                "failed to write temporary settings file '{}'",
                tmp_path.display()
            )
        })?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "failed to atomically rename settings file '{}' to '{}'",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }

    pub fn celebration_backend(&self) -> CelebrationBackend {
        CelebrationBackend::from_settings_value(&self.celebration).unwrap_or_default()
    }

    fn validate(&mut self) {
        self.plan_timeout_ms = self
            .plan_timeout_ms
            .clamp(MIN_PLAN_TIMEOUT_MS, MAX_PLAN_TIMEOUT_MS);

        self.theme = match ThemePreset::from_str(&self.theme) {
            Ok(preset) => preset.as_str().to_string(),
            Err(()) => {
                warn!(
                    "invalid theme '{}' in settings config; falling back to default",
                    self.theme
                );
                DEFAULT_THEME.to_string()
            }
        };

        self.celebration = match CelebrationBackend::from_str(&self.celebration) {
            Ok(backend) => backend.as_str().to_string(),
            Err(()) => {
                warn!(
                    "invalid celebration backend '{}' in settings config; falling back to {}",
                    self.celebration, DEFAULT_CELEBRATION
                );
                DEFAULT_CELEBRATION.to_string()
            }
        };

        if self.planner_model.trim().is_empty() {
            self.planner_model = DEFAULT_PLANNER_MODEL.to_string();
        } else {
            self.planner_model = self.planner_model.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings_file_path(temp_dir: &TempDir) -> PathBuf {
        temp_dir.path().join("cyber-tasker").join("settings.toml")
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.theme, "cyber");
        assert_eq!(settings.celebration, "both");
        assert_eq!(settings.planner_model, "gemini-pro");
        assert_eq!(settings.plan_timeout_ms, 10_000);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let path = settings_file_path(&temp_dir);
        let settings = Settings::load_from_path(&path);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_malformed_toml() {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let path = settings_file_path(&temp_dir);
        fs::create_dir_all(path.parent().expect("settings path should have parent"))
            .expect("failed to create config dir");
        fs::write(&path, "theme = \"mono\"\nplan_timeout_ms = [invalid")
            .expect("failed to write malformed settings");

        let settings = Settings::load_from_path(&path);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_partial_toml() {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let path = settings_file_path(&temp_dir);
        fs::create_dir_all(path.parent().expect("settings path should have parent"))
            .expect("failed to create config dir");
        fs::write(&path, "theme = \"mono\"").expect("failed to write partial settings");

        let settings = Settings::load_from_path(&path);
        assert_eq!(settings.theme, "mono");
        assert_eq!(settings.celebration, DEFAULT_CELEBRATION);
        assert_eq!(settings.planner_model, DEFAULT_PLANNER_MODEL);
        assert_eq!(settings.plan_timeout_ms, DEFAULT_PLAN_TIMEOUT_MS);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let path = settings_file_path(&temp_dir);
        let mut expected = Settings {
            theme: "light".to_string(),
            celebration: "bell".to_string(),
            planner_model: "gemini-1.5-flash".to_string(),
            plan_timeout_ms: 2_500,
        };
        expected.validate();

        expected
            .save_to_path(&path)
            .expect("failed to save settings for roundtrip test");
        let loaded = Settings::load_from_path(&path);

        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_validate_clamps_timeout() {
        let mut settings = Settings {
            plan_timeout_ms: 1,
            ..Settings::default()
        };
        settings.validate();
        assert_eq!(settings.plan_timeout_ms, MIN_PLAN_TIMEOUT_MS);

        settings.plan_timeout_ms = u64::MAX;
        settings.validate();
        assert_eq!(settings.plan_timeout_ms, MAX_PLAN_TIMEOUT_MS);
    }

    #[test]
    fn test_validate_invalid_theme() {
        let mut settings = Settings {
            theme: "retro-wave".to_string(),
            ..Settings::default()
        };
        settings.validate();
        assert_eq!(settings.theme, "cyber");
    }

    #[test]
    fn test_validate_invalid_celebration() {
        let mut settings = Settings {
            celebration: "confetti".to_string(),
            ..Settings::default()
        };
        settings.validate();
        assert_eq!(settings.celebration, "both");
        assert_eq!(settings.celebration_backend(), CelebrationBackend::Both);
    }

    #[test]
    fn test_validate_blank_planner_model() {
        let mut settings = Settings {
            planner_model: "   ".to_string(),
            ..Settings::default()
        };
        settings.validate();
        assert_eq!(settings.planner_model, DEFAULT_PLANNER_MODEL);
    }
}
