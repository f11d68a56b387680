use serde::{Deserialize, Serialize};

use crate::game::{DEFAULT_MAX_RANGE, DEFAULT_MIN_RANGE};

/// User-editable game settings, persisted under `gameSettings`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub haptic_enabled: bool,
    pub min_range: i64,
    pub max_range: i64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            haptic_enabled: true,
            min_range: DEFAULT_MIN_RANGE,
            max_range: DEFAULT_MAX_RANGE,
        }
    }
}

/// Partial settings supplied on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub min_range: Option<i64>,
    pub max_range: Option<i64>,
    pub haptic_enabled: Option<bool>,
}

impl SettingsOverrides {
    pub fn is_empty(&self) -> bool {
        self.min_range.is_none() && self.max_range.is_none() && self.haptic_enabled.is_none()
    }
}

impl GameSettings {
    /// Merge overrides into a copy of these settings.
    ///
    /// Returns `None` when the merged range would be inverted, leaving the
    /// caller to report it.
    pub fn with_overrides(&self, overrides: &SettingsOverrides) -> Option<GameSettings> {
        let merged = GameSettings {
            haptic_enabled: overrides.haptic_enabled.unwrap_or(self.haptic_enabled),
            min_range: overrides.min_range.unwrap_or(self.min_range),
            max_range: overrides.max_range.unwrap_or(self.max_range),
        };

        if merged.min_range > merged.max_range {
            None
        } else {
            Some(merged)
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min_range <= self.max_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = GameSettings::default();
        assert!(settings.haptic_enabled);
        assert_eq!(settings.min_range, 1);
        assert_eq!(settings.max_range, 100);
        assert!(settings.is_valid());
    }

    #[test]
    fn settings_use_camel_case_keys() {
        let json = serde_json::to_value(GameSettings::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"hapticEnabled": true, "minRange": 1, "maxRange": 100})
        );
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let settings = GameSettings::default();
        let overrides = SettingsOverrides {
            max_range: Some(1000),
            haptic_enabled: Some(false),
            ..Default::default()
        };

        let merged = settings.with_overrides(&overrides).unwrap();
        assert_eq!(merged.min_range, 1);
        assert_eq!(merged.max_range, 1000);
        assert!(!merged.haptic_enabled);
    }

    #[test]
    fn overrides_reject_inverted_range() {
        let settings = GameSettings::default();
        let overrides = SettingsOverrides {
            min_range: Some(500),
            ..Default::default()
        };
        assert_eq!(settings.with_overrides(&overrides), None);
    }

    #[test]
    fn empty_overrides() {
        assert!(SettingsOverrides::default().is_empty());
        let overrides = SettingsOverrides {
            min_range: Some(0),
            ..Default::default()
        };
        assert!(!overrides.is_empty());
        assert_eq!(
            GameSettings::default().with_overrides(&SettingsOverrides::default()),
            Some(GameSettings::default())
        );
    }
}
