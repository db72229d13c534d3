use crate::{Result, ScanError};
use std::fmt;

/// Clockwise rotation, always one of 0, 90, 180 or 270 degrees.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RotationFrame(u16);

impl RotationFrame {
    pub const DEG_0: RotationFrame = RotationFrame(0);
    pub const DEG_90: RotationFrame = RotationFrame(90);
    pub const DEG_180: RotationFrame = RotationFrame(180);
    pub const DEG_270: RotationFrame = RotationFrame(270);

    /// Normalize any multiple of 90 into `[0, 360)`.
    ///
    /// Drivers have been seen to report values like -90, which are accepted.
    /// Anything not on a 90 degree boundary is rejected rather than rounded.
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(ScanError::InvalidRotation(degrees));
        }
        Ok(RotationFrame(degrees.rem_euclid(360) as u16))
    }

    pub fn degrees(self) -> u16 {
        self.0
    }

    /// Addition mod 360.
    pub fn compose(self, other: RotationFrame) -> RotationFrame {
        RotationFrame((self.0 + other.0) % 360)
    }

    /// Negation mod 360, used for mirrored (front-facing) sensors.
    pub fn mirrored(self) -> RotationFrame {
        RotationFrame((360 - self.0) % 360)
    }
}

impl fmt::Display for RotationFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// Which way the camera sensor faces.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Front = 0,
    Back = 1,
}

/// A pixel size. Width is not assumed to be the long edge.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_portrait(&self) -> bool {
        self.width < self.height
    }

    pub fn swapped(&self) -> Resolution {
        Resolution::new(self.height, self.width)
    }

    /// Same size with the long edge as width, the orientation sensors enumerate in.
    pub fn landscape(&self) -> Resolution {
        if self.is_portrait() {
            self.swapped()
        } else {
            *self
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// 2D point in sensor pixel space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Points reported by the detector for one positive detection.
///
/// The first two points are the most reliable pair (finder pattern centers
/// for QR codes); only their distance is used.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectionGeometry {
    pub points: Vec<Point>,
}

impl DetectionGeometry {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Apparent code width in whole pixels, or `None` with fewer than two points.
    pub fn apparent_width(&self) -> Option<u32> {
        match self.points.as_slice() {
            [a, b, ..] => Some(a.distance(b) as u32),
            _ => None,
        }
    }
}

/// Region of the preview where the code is expected to be centered.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramingRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl FramingRect {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// A `width` x `height` rectangle centered on the screen, clamped to fit.
    ///
    /// Edges past `i32::MAX` saturate.
    pub fn centered(screen: Resolution, width: u32, height: u32) -> FramingRect {
        let width = width.min(screen.width);
        let height = height.min(screen.height);
        let left = (screen.width - width) / 2;
        let top = (screen.height - height) / 2;
        let edge = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        FramingRect {
            left: edge(left),
            top: edge(top),
            right: edge(left + width),
            bottom: edge(top + height),
        }
    }
}

bitflags::bitflags! {
    /// Optional camera behaviours carried in a parameter snapshot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(C)]
    pub struct CameraOptions: u32 {
        const AUTO_FOCUS            = 1 << 0;
        const CONTINUOUS_FOCUS      = 1 << 1;
        const TORCH                 = 1 << 2;
        const EXPOSURE_COMPENSATION = 1 << 3;
        const INVERT_COLOR          = 1 << 4;
        const BARCODE_SCENE         = 1 << 5;
        const VIDEO_STABILIZATION   = 1 << 6;
        const METERING_AREAS        = 1 << 7;
        const RECORDING_HINT        = 1 << 8;
    }
}

impl Default for CameraOptions {
    fn default() -> Self {
        CameraOptions::empty()
    }
}

/// Zoom state as last read back from the driver.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoomState {
    pub supported: bool,
    pub current: u32,
    pub max: u32,
}

/// Preview size as requested from the driver and as the driver actually applied it.
///
/// Geometry downstream must use `confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSize {
    pub requested: Resolution,
    pub confirmed: Resolution,
}

impl PreviewSize {
    pub fn new(requested: Resolution) -> Self {
        Self {
            requested,
            confirmed: requested,
        }
    }

    /// Adopt the driver-reported size. Returns true if it differed.
    pub fn confirm(&mut self, reported: Resolution) -> bool {
        let changed = reported != self.confirmed;
        self.confirmed = reported;
        changed
    }
}

/// Everything computed once per camera open.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationState {
    pub(crate) needed_preview_rotation: RotationFrame,
    pub(crate) display_to_camera_rotation: RotationFrame,
    pub(crate) screen_resolution: Resolution,
    pub(crate) camera_capture_resolution: Resolution,
    pub(crate) best_preview: PreviewSize,
    pub(crate) preview_resolution_on_screen: Resolution,
}

impl CalibrationState {
    /// Rotation to apply to decoded coordinates.
    pub fn needed_preview_rotation(&self) -> RotationFrame {
        self.needed_preview_rotation
    }

    /// Rotation handed to the driver as the display orientation.
    pub fn display_to_camera_rotation(&self) -> RotationFrame {
        self.display_to_camera_rotation
    }

    pub fn screen_resolution(&self) -> Resolution {
        self.screen_resolution
    }

    pub fn camera_capture_resolution(&self) -> Resolution {
        self.camera_capture_resolution
    }

    /// Last confirmed preview size.
    pub fn best_preview_resolution(&self) -> Resolution {
        self.best_preview.confirmed
    }

    pub fn requested_preview_resolution(&self) -> Resolution {
        self.best_preview.requested
    }

    pub fn preview_resolution_on_screen(&self) -> Resolution {
        self.preview_resolution_on_screen
    }
}
