//! Vendor zoom capability parsing.
//!
//! Camera drivers expose zoom limits as loosely formatted string key/values,
//! and which keys exist depends on the vendor. Each key is handled by one
//! [`CapabilityRule`]; a rule whose value does not parse is logged and skipped
//! without affecting the others.

use crate::error::CapabilityParseError;
use std::collections::HashMap;

/// String key/value capability snapshot as reported by the driver.
pub type CapabilitySnapshot = HashMap<String, String>;

/// Desired zoom when nothing tighter is reported: 2.7x.
pub const DEFAULT_DESIRED_TENTHS: i32 = 27;

// -- Capability keys --
pub const KEY_ZOOM_SUPPORTED: &str = "zoom-supported";
pub const KEY_MAX_ZOOM: &str = "max-zoom";
pub const KEY_TAKING_PICTURE_ZOOM_MAX: &str = "taking-picture-zoom-max";
pub const KEY_MOT_ZOOM_VALUES: &str = "mot-zoom-values";
pub const KEY_MOT_ZOOM_STEP: &str = "mot-zoom-step";

/// Result of the capability computation, in tenths of a zoom factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesiredZoom {
    /// The camera declared zoom unsupported; no zoom parameter may be written.
    NoZoom,
    Tenths(i32),
}

/// One parsed capability value.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityField {
    ZoomSupported(bool),
    /// Maximum zoom, in tenths.
    MaxZoom(i32),
    /// Vendor cap while capturing, in tenths.
    TakingPictureZoomMax(i32),
    /// Discrete zoom values in list order, in tenths.
    ZoomValues(Vec<i32>),
    /// Zoom step, in tenths.
    ZoomStep(i32),
}

/// Parser for a single capability key. Rules run in [`RULES`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityRule {
    ZoomSupported,
    MaxZoom,
    TakingPictureZoomMax,
    ZoomValues,
    ZoomStep,
}

pub const RULES: [CapabilityRule; 5] = [
    CapabilityRule::ZoomSupported,
    CapabilityRule::MaxZoom,
    CapabilityRule::TakingPictureZoomMax,
    CapabilityRule::ZoomValues,
    CapabilityRule::ZoomStep,
];

impl CapabilityRule {
    pub fn key(self) -> &'static str {
        match self {
            CapabilityRule::ZoomSupported => KEY_ZOOM_SUPPORTED,
            CapabilityRule::MaxZoom => KEY_MAX_ZOOM,
            CapabilityRule::TakingPictureZoomMax => KEY_TAKING_PICTURE_ZOOM_MAX,
            CapabilityRule::ZoomValues => KEY_MOT_ZOOM_VALUES,
            CapabilityRule::ZoomStep => KEY_MOT_ZOOM_STEP,
        }
    }

    /// Parse this rule's raw value.
    pub fn parse(self, raw: &str) -> Result<CapabilityField, CapabilityParseError> {
        let bad = || CapabilityParseError {
            key: self.key(),
            value: raw.to_string(),
        };
        let value = raw.trim();

        match self {
            CapabilityRule::ZoomSupported => {
                if value.eq_ignore_ascii_case("true") {
                    Ok(CapabilityField::ZoomSupported(true))
                } else if value.eq_ignore_ascii_case("false") {
                    Ok(CapabilityField::ZoomSupported(false))
                } else {
                    Err(bad())
                }
            }
            CapabilityRule::MaxZoom => parse_factor_tenths(value)
                .map(CapabilityField::MaxZoom)
                .ok_or_else(bad),
            CapabilityRule::TakingPictureZoomMax => value
                .parse::<i32>()
                .map(CapabilityField::TakingPictureZoomMax)
                .map_err(|_| bad()),
            CapabilityRule::ZoomValues => value
                .split(',')
                .map(|entry| parse_finite(entry.trim()).map(|v| v as i32))
                .collect::<Option<Vec<i32>>>()
                .filter(|values| !values.is_empty())
                .map(CapabilityField::ZoomValues)
                .ok_or_else(bad),
            CapabilityRule::ZoomStep => parse_factor_tenths(value)
                .map(CapabilityField::ZoomStep)
                .ok_or_else(bad),
        }
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// "2.5" => 25, truncating.
fn parse_factor_tenths(s: &str) -> Option<i32> {
    parse_finite(s).map(|v| (10.0 * v) as i32)
}

/// Capability fields parsed from one snapshot, in rule order.
///
/// Parsed once per calibration and not refreshed until the next one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZoomCapability {
    pub fields: Vec<CapabilityField>,
}

impl ZoomCapability {
    /// Run every rule whose key is present. Unparsable values are logged and dropped.
    pub fn from_snapshot(snapshot: &CapabilitySnapshot) -> ZoomCapability {
        let mut fields = Vec::new();
        for rule in RULES {
            let Some(raw) = snapshot.get(rule.key()) else {
                continue;
            };
            match rule.parse(raw) {
                Ok(field) => fields.push(field),
                Err(e) => log::warn!("{}", e),
            }
        }
        ZoomCapability { fields }
    }

    /// Apply the parsed fields to `base_tenths`, each step only tightening.
    pub fn desired_zoom(&self, base_tenths: i32) -> DesiredZoom {
        let mut desired = base_tenths;

        for field in &self.fields {
            match field {
                CapabilityField::ZoomSupported(false) => return DesiredZoom::NoZoom,
                CapabilityField::ZoomSupported(true) => {}
                CapabilityField::MaxZoom(max) | CapabilityField::TakingPictureZoomMax(max) => {
                    desired = desired.min(*max);
                }
                CapabilityField::ZoomValues(values) => {
                    desired = closest_value(values, desired);
                }
                CapabilityField::ZoomStep(step) => {
                    if *step > 1 {
                        desired -= desired % step;
                    }
                }
            }
        }

        DesiredZoom::Tenths(desired)
    }
}

/// Entry closest to `desired`; the earliest entry wins a tie.
fn closest_value(values: &[i32], desired: i32) -> i32 {
    let mut best = desired;
    let mut best_distance = u32::MAX;
    for &value in values {
        let distance = value.abs_diff(desired);
        if distance < best_distance {
            best = value;
            best_distance = distance;
        }
    }
    best
}

/// Compute the desired zoom, in tenths, from a raw capability snapshot.
pub fn compute_desired_zoom(snapshot: &CapabilitySnapshot, base_tenths: i32) -> DesiredZoom {
    let desired = ZoomCapability::from_snapshot(snapshot).desired_zoom(base_tenths);
    log::debug!("Desired zoom from capabilities: {:?}", desired);
    desired
}
