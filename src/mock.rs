//! In-memory camera driver for tests and demos.

use crate::capability::CapabilitySnapshot;
use crate::driver::{CameraDriver, DisplayInfo, Frame, Parameters, SensorInfo};
use crate::types::{Facing, Resolution, RotationFrame};
use crate::{Result, ScanError};
use std::time::Duration;

pub struct MockCamera {
    sensor: SensorInfo,
    display: DisplayInfo,
    params: Parameters,
    capabilities: CapabilitySnapshot,
    preview_override: Option<Resolution>,
    display_orientation: Option<RotationFrame>,
    frame_limit: Option<u64>,
    frames_delivered: u64,
    zoom_writes: Vec<u32>,
    fail_parameters: bool,
}

impl MockCamera {
    pub fn new(sensor: SensorInfo, display: DisplayInfo) -> Self {
        Self {
            sensor,
            display,
            params: Parameters::default(),
            capabilities: CapabilitySnapshot::new(),
            preview_override: None,
            display_orientation: None,
            frame_limit: None,
            frames_delivered: 0,
            zoom_writes: Vec::new(),
            fail_parameters: false,
        }
    }

    /// Portrait 1080x1920 phone, back sensor mounted at 90, common landscape sizes.
    pub fn phone() -> Self {
        Self::new(
            SensorInfo {
                mount_rotation: 90,
                facing: Facing::Back,
            },
            DisplayInfo {
                rotation: 0,
                screen: Resolution::new(1080, 1920),
            },
        )
        .with_supported_sizes(&[(640, 480), (1280, 720), (1920, 1080), (1600, 1200)])
    }

    pub fn with_supported_sizes(mut self, sizes: &[(u32, u32)]) -> Self {
        self.params.supported_preview_sizes = sizes
            .iter()
            .map(|&(w, h)| Resolution::new(w, h))
            .collect();
        self
    }

    pub fn with_zoom(mut self, max_zoom: u32) -> Self {
        self.params.zoom_supported = true;
        self.params.max_zoom = max_zoom;
        self
    }

    pub fn with_current_zoom(mut self, zoom: u32) -> Self {
        self.params.zoom = zoom;
        self
    }

    pub fn with_capability(mut self, key: &str, value: &str) -> Self {
        self.capabilities.insert(key.to_string(), value.to_string());
        self
    }

    /// Silently apply `size` whenever any preview size is requested.
    pub fn with_preview_override(mut self, width: u32, height: u32) -> Self {
        self.preview_override = Some(Resolution::new(width, height));
        self
    }

    /// Stop producing frames after `limit` have been delivered.
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    /// Make every parameter read fail.
    pub fn with_failing_parameters(mut self) -> Self {
        self.fail_parameters = true;
        self
    }

    pub fn current_parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn display_orientation(&self) -> Option<RotationFrame> {
        self.display_orientation
    }

    /// Zoom values written through `set_parameters`, in order, after clamping.
    pub fn zoom_writes(&self) -> &[u32] {
        &self.zoom_writes
    }

    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered
    }
}

impl CameraDriver for MockCamera {
    fn sensor_info(&self) -> SensorInfo {
        self.sensor
    }

    fn display_info(&self) -> DisplayInfo {
        self.display
    }

    fn parameters(&mut self) -> Result<Parameters> {
        if self.fail_parameters {
            return Err(ScanError::Driver("parameters unavailable".into()));
        }
        Ok(self.params.clone())
    }

    fn set_parameters(&mut self, params: &Parameters) -> Result<()> {
        let mut next = params.clone();
        // Capabilities are read-only.
        next.supported_preview_sizes = self.params.supported_preview_sizes.clone();
        next.zoom_supported = self.params.zoom_supported;
        next.max_zoom = self.params.max_zoom;

        if next.preview_size.is_some() {
            if let Some(size) = self.preview_override {
                next.preview_size = Some(size);
            }
        }

        if next.zoom_supported {
            next.zoom = next.zoom.min(next.max_zoom);
            if next.zoom != self.params.zoom {
                self.zoom_writes.push(next.zoom);
            }
        } else {
            next.zoom = 0;
        }

        self.params = next;
        Ok(())
    }

    fn capability_snapshot(&mut self) -> Result<CapabilitySnapshot> {
        Ok(self.capabilities.clone())
    }

    fn set_display_orientation(&mut self, rotation: RotationFrame) -> Result<()> {
        self.display_orientation = Some(rotation);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.frame_limit.is_some_and(|limit| self.frames_delivered >= limit) {
            std::thread::sleep(Duration::from_millis(1));
            return Ok(None);
        }
        let size = self.params.preview_size.unwrap_or_default();
        let frame = Frame {
            sequence: self.frames_delivered,
            size,
            data: Vec::new(),
        };
        self.frames_delivered += 1;
        Ok(Some(frame))
    }
}
