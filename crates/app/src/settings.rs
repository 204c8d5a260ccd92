use log::error;
use repcycle_domain::DefaultInterval;
use strum::{Display, EnumString};

pub trait SettingsService {
    fn get_settings(&self) -> Result<Settings, String>;
    fn set_settings(&self, settings: Settings) -> Result<(), String>;
}

pub trait SettingsRepository {
    fn read_settings(&self) -> Result<Settings, String>;
    fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub unit: Unit,
    pub default_sets: u32,
    pub smoothing_radius: u32,
    #[serde(with = "DefaultIntervalDef")]
    pub default_interval: DefaultInterval,
}

impl Settings {
    pub fn validate_default_sets(value: &str) -> Result<u32, SettingsError> {
        match value.trim().parse::<u32>() {
            Ok(sets) if (1..=10).contains(&sets) => Ok(sets),
            Ok(sets) => Err(SettingsError::DefaultSetsOutOfRange(sets)),
            Err(_) => Err(SettingsError::ParseError("default sets".to_string())),
        }
    }

    pub fn validate_smoothing_radius(value: &str) -> Result<u32, SettingsError> {
        match value.trim().parse::<u32>() {
            Ok(radius) if radius <= 30 => Ok(radius),
            Ok(radius) => Err(SettingsError::SmoothingRadiusOutOfRange(radius)),
            Err(_) => Err(SettingsError::ParseError("smoothing radius".to_string())),
        }
    }

    /// Number of sets of an exercise without previous performance.
    #[must_use]
    pub fn default_sets(&self) -> usize {
        match usize::try_from(self.default_sets) {
            Ok(sets) if sets > 0 => sets,
            _ => {
                error!("invalid number of default sets: {}", self.default_sets);
                Settings::default().default_sets as usize
            }
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unit: Unit::Kg,
            default_sets: 3,
            smoothing_radius: 2,
            default_interval: DefaultInterval::Quarter,
        }
    }
}

#[derive(
    serde::Serialize, serde::Deserialize, Debug, Display, EnumString, Clone, Copy, PartialEq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Unit {
    Kg,
    Lb,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(remote = "DefaultInterval")]
enum DefaultIntervalDef {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "1y")]
    Year,
    #[serde(rename = "6m")]
    HalfYear,
    #[serde(rename = "3m")]
    Quarter,
    #[serde(rename = "1m")]
    Month,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("Default sets must be in the range 1 to 10 ({0})")]
    DefaultSetsOutOfRange(u32),
    #[error("Smoothing radius must be 30 or less ({0})")]
    SmoothingRadiusOutOfRange(u32),
    #[error("Invalid {0}")]
    ParseError(String),
}
