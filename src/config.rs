use crate::types::CameraOptions;
use std::collections::HashMap;

// -- Preference keys --
pub const KEY_AUTO_FOCUS: &str = "preferences_auto_focus";
pub const KEY_DISABLE_CONTINUOUS_FOCUS: &str = "preferences_disable_continuous_focus";
pub const KEY_INVERT_SCAN: &str = "preferences_invert_scan";
pub const KEY_DISABLE_BARCODE_SCENE_MODE: &str = "preferences_disable_barcode_scene_mode";
pub const KEY_DISABLE_METERING: &str = "preferences_disable_metering";
pub const KEY_DISABLE_EXPOSURE: &str = "preferences_disable_exposure";
pub const KEY_BULK_MODE: &str = "preferences_bulk_mode";
pub const KEY_FRONT_LIGHT: &str = "preferences_front_light";

/// Read-only scanner preferences for one calibration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Default true.
    pub auto_focus: bool,
    /// Default true.
    pub disable_continuous_focus: bool,
    /// Default false.
    pub invert_scan: bool,
    /// Default true.
    pub disable_barcode_scene_mode: bool,
    /// Default true.
    pub disable_metering: bool,
    /// Default true.
    pub disable_exposure: bool,
    /// Keep scanning after a result. Default false.
    pub bulk_mode: bool,
    /// Default false.
    pub front_light: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            auto_focus: true,
            disable_continuous_focus: true,
            invert_scan: false,
            disable_barcode_scene_mode: true,
            disable_metering: true,
            disable_exposure: true,
            bulk_mode: false,
            front_light: false,
        }
    }
}

impl ScanConfig {
    /// Build from stored preferences. Missing or malformed values keep their default.
    pub fn from_preferences(prefs: &HashMap<String, String>) -> ScanConfig {
        let defaults = ScanConfig::default();
        let flag = |key: &str, default: bool| match prefs.get(key).map(|v| v.trim()) {
            None => default,
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            Some(v) => {
                log::warn!("Bad preference {}: {:?}, using {}", key, v, default);
                default
            }
        };

        ScanConfig {
            auto_focus: flag(KEY_AUTO_FOCUS, defaults.auto_focus),
            disable_continuous_focus: flag(
                KEY_DISABLE_CONTINUOUS_FOCUS,
                defaults.disable_continuous_focus,
            ),
            invert_scan: flag(KEY_INVERT_SCAN, defaults.invert_scan),
            disable_barcode_scene_mode: flag(
                KEY_DISABLE_BARCODE_SCENE_MODE,
                defaults.disable_barcode_scene_mode,
            ),
            disable_metering: flag(KEY_DISABLE_METERING, defaults.disable_metering),
            disable_exposure: flag(KEY_DISABLE_EXPOSURE, defaults.disable_exposure),
            bulk_mode: flag(KEY_BULK_MODE, defaults.bulk_mode),
            front_light: flag(KEY_FRONT_LIGHT, defaults.front_light),
        }
    }

    /// Camera options these preferences ask for.
    ///
    /// Safe mode only honours focus and torch.
    pub fn camera_options(&self, safe_mode: bool) -> CameraOptions {
        let mut options = CameraOptions::empty();
        options.set(CameraOptions::TORCH, self.front_light);

        if self.auto_focus {
            options |= CameraOptions::AUTO_FOCUS;
            if !safe_mode && !self.disable_continuous_focus {
                options |= CameraOptions::CONTINUOUS_FOCUS;
            }
        }

        if safe_mode {
            return options;
        }

        if !self.disable_exposure {
            options |= CameraOptions::EXPOSURE_COMPENSATION;
        }
        if self.invert_scan {
            options |= CameraOptions::INVERT_COLOR;
        }
        if !self.disable_barcode_scene_mode {
            options |= CameraOptions::BARCODE_SCENE;
        }
        if !self.disable_metering {
            options |= CameraOptions::VIDEO_STABILIZATION | CameraOptions::METERING_AREAS;
        }
        options | CameraOptions::RECORDING_HINT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_preferences_use_defaults() {
        let config = ScanConfig::from_preferences(&HashMap::new());
        assert_eq!(config, ScanConfig::default());
        assert!(config.auto_focus);
        assert!(!config.bulk_mode);
    }

    #[test]
    fn test_preferences_override_and_malformed_fallback() {
        let prefs: HashMap<String, String> = [
            (KEY_BULK_MODE, "true"),
            (KEY_AUTO_FOCUS, "False"),
            (KEY_INVERT_SCAN, "yes"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = ScanConfig::from_preferences(&prefs);
        assert!(config.bulk_mode);
        assert!(!config.auto_focus);
        assert!(!config.invert_scan);
    }

    #[test]
    fn test_default_options() {
        let options = ScanConfig::default().camera_options(false);
        assert_eq!(
            options,
            CameraOptions::AUTO_FOCUS | CameraOptions::RECORDING_HINT
        );
    }

    #[test]
    fn test_safe_mode_drops_extras() {
        let config = ScanConfig {
            disable_continuous_focus: false,
            invert_scan: true,
            disable_metering: false,
            front_light: true,
            ..ScanConfig::default()
        };

        let full = config.camera_options(false);
        assert!(full.contains(CameraOptions::CONTINUOUS_FOCUS));
        assert!(full.contains(CameraOptions::INVERT_COLOR | CameraOptions::METERING_AREAS));

        let safe = config.camera_options(true);
        assert_eq!(safe, CameraOptions::AUTO_FOCUS | CameraOptions::TORCH);
    }
}
