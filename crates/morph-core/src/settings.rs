//! Analyzer settings loaded from TOML.
//!
//! - `Settings::default()` mirrors the embedded `default_settings.toml`
//! - `parse_settings_toml(toml)` parses and validates a custom file
//! - settings are owned by each `Analyzer`; there is no global instance

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub predictor: PredictorSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictorSettings {
    pub max_suffix_length: usize,
    pub min_word_length: usize,
    pub max_candidates: usize,
    pub score_scale: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CacheSettings {
    pub capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            predictor: PredictorSettings::default(),
            cache: CacheSettings { capacity: 10_000 },
        }
    }
}

impl Default for PredictorSettings {
    fn default() -> Self {
        Self {
            max_suffix_length: 6,
            min_word_length: 4,
            max_candidates: 20,
            score_scale: 1.0,
        }
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

pub(crate) fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_positive_usize!(predictor.max_suffix_length);
    check_positive_usize!(predictor.min_word_length);
    check_positive_usize!(predictor.max_candidates);

    // NaN fails both comparisons, so it is rejected here too.
    let scale = s.predictor.score_scale;
    if !(scale > 0.0 && scale <= 1.0) {
        return Err(SettingsError::InvalidValue {
            field: "predictor.score_scale".to_string(),
            reason: "must be in (0, 1]".to_string(),
        });
    }

    // cache.capacity = 0 is valid and disables the cache
    Ok(())
}
