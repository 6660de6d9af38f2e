//! Configuration for Sentivision.

use crate::store::SESSIONS_FILE;
use crate::tier::{GatingPolicy, SubscriptionTier, TierContext};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Main configuration for the recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interval between emotion samples
    #[serde(with = "duration_ms_serde", rename = "sample_interval_ms")]
    pub sample_interval: Duration,

    /// Which capture device to use
    pub capture: CaptureConfig,

    /// Path for storing sessions and transparency stats
    pub data_path: PathBuf,

    /// Path for CSV exports
    pub export_path: PathBuf,

    /// IANA timezone used when rendering dates
    pub display_timezone: String,

    /// Active subscription tier
    pub tier: SubscriptionTier,

    /// Whether tier limits are applied
    pub tier_gating: GatingPolicy,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sentivision");

        Self {
            sample_interval: Duration::from_millis(500),
            capture: CaptureConfig::default(),
            export_path: data_dir.join("exports"),
            data_path: data_dir,
            display_timezone: "UTC".to_string(),
            tier: SubscriptionTier::Free,
            tier_gating: GatingPolicy::Disabled,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults when absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        config.timezone()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sentivision")
            .join("config.json")
    }

    /// Ensure all required directories exist.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.export_path)?;
        std::fs::create_dir_all(&self.data_path)?;
        Ok(())
    }

    pub fn sessions_path(&self) -> PathBuf {
        self.data_path.join(SESSIONS_FILE)
    }

    pub fn transparency_path(&self) -> PathBuf {
        self.data_path.join("transparency.json")
    }

    /// Parse the display timezone.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.display_timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.display_timezone.clone()))
    }

    pub fn tier_context(&self) -> TierContext {
        TierContext::new(self.tier, self.tier_gating)
    }

    /// Update one setting by its file key. The config is left untouched when
    /// `value` does not parse.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: key.to_string(),
            reason,
        };

        match key {
            "sample_interval_ms" => {
                let ms: u64 = value.trim().parse().map_err(|e| invalid(format!("{e}")))?;
                if ms == 0 {
                    return Err(invalid("must be positive".to_string()));
                }
                self.sample_interval = Duration::from_millis(ms);
            }
            "capture.device" => self.capture.device = value.parse()?,
            "data_path" => self.data_path = PathBuf::from(value),
            "export_path" => self.export_path = PathBuf::from(value),
            "display_timezone" => {
                let tz = value
                    .trim()
                    .parse::<Tz>()
                    .map_err(|_| ConfigError::InvalidTimezone(value.to_string()))?;
                self.display_timezone = tz.name().to_string();
            }
            "tier" => {
                self.tier = value
                    .parse::<SubscriptionTier>()
                    .map_err(|e| invalid(e.to_string()))?
            }
            "tier_gating" => {
                self.tier_gating = value
                    .parse::<GatingPolicy>()
                    .map_err(|e| invalid(e.to_string()))?
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }

        tracing::debug!(key, value, "config value set");
        Ok(())
    }
}

/// Capture device selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub device: CaptureDevice,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureDevice {
    #[default]
    Simulated,
    None,
}

impl FromStr for CaptureDevice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simulated" => Ok(CaptureDevice::Simulated),
            "none" => Ok(CaptureDevice::None),
            other => Err(ConfigError::UnknownDevice(other.to_string())),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
    #[error("Unknown capture device: {0}")]
    UnknownDevice(String),
    #[error("Unknown config key: {0}")]
    UnknownKey(String),
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Serde support for millisecond durations.
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}
