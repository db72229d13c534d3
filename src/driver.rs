use crate::capability::CapabilitySnapshot;
use crate::types::{CameraOptions, Facing, Resolution, RotationFrame, ZoomState};
use crate::Result;

/// Parameter snapshot read from, and written back to, the camera.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parameters {
    /// Active preview size, if the driver reports one.
    pub preview_size: Option<Resolution>,
    pub supported_preview_sizes: Vec<Resolution>,
    pub zoom_supported: bool,
    pub zoom: u32,
    pub max_zoom: u32,
    pub options: CameraOptions,
}

impl Parameters {
    pub fn zoom_state(&self) -> ZoomState {
        ZoomState {
            supported: self.zoom_supported,
            current: self.zoom,
            max: self.max_zoom,
        }
    }
}

/// Fixed facts about the opened sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorInfo {
    /// Clockwise degrees from natural device orientation to the sensor.
    pub mount_rotation: i32,
    pub facing: Facing,
}

/// Display state at the moment of calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayInfo {
    /// Rotation code or raw degrees, see [`crate::rotation::display_rotation`].
    pub rotation: i32,
    /// Screen size in the current orientation.
    pub screen: Resolution,
}

/// One raw preview frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub sequence: u64,
    pub size: Resolution,
    pub data: Vec<u8>,
}

/// Hardware parameter interface of an opened camera.
///
/// All calls are blocking and must stay off any rendering path.
pub trait CameraDriver: Send {
    fn sensor_info(&self) -> SensorInfo;

    fn display_info(&self) -> DisplayInfo;

    fn parameters(&mut self) -> Result<Parameters>;

    fn set_parameters(&mut self, params: &Parameters) -> Result<()>;

    /// Vendor key/value capabilities. Keys and formats are untrusted.
    fn capability_snapshot(&mut self) -> Result<CapabilitySnapshot>;

    fn set_display_orientation(&mut self, rotation: RotationFrame) -> Result<()>;

    /// Next preview frame, or `None` if none arrived within the driver's poll interval.
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Exclusive handle to an opened camera.
///
/// Every parameter read and write goes through `&mut self`, so a
/// read-modify-write can never interleave with another writer.
pub struct CameraHandle<D: CameraDriver> {
    driver: D,
}

impl<D: CameraDriver> CameraHandle<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Release the handle and return the driver.
    pub fn into_inner(self) -> D {
        self.driver
    }

    pub fn sensor_info(&self) -> SensorInfo {
        self.driver.sensor_info()
    }

    pub fn display_info(&self) -> DisplayInfo {
        self.driver.display_info()
    }

    pub fn parameters(&mut self) -> Result<Parameters> {
        self.driver.parameters()
    }

    pub fn capability_snapshot(&mut self) -> Result<CapabilitySnapshot> {
        self.driver.capability_snapshot()
    }

    /// Apply `params` and read back what the driver actually accepted.
    pub fn apply(&mut self, params: &Parameters) -> Result<Parameters> {
        self.driver.set_parameters(params)?;
        self.driver.parameters()
    }

    pub fn set_display_orientation(&mut self, rotation: RotationFrame) -> Result<()> {
        self.driver.set_display_orientation(rotation)
    }

    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        self.driver.next_frame()
    }

    /// Fresh zoom state from the driver.
    pub fn zoom_state(&mut self) -> Result<ZoomState> {
        Ok(self.driver.parameters()?.zoom_state())
    }

    /// Write a zoom index and return the zoom state the driver reports afterwards.
    pub fn set_zoom(&mut self, zoom: u32) -> Result<ZoomState> {
        let mut params = self.driver.parameters()?;
        params.zoom = zoom;
        Ok(self.apply(&params)?.zoom_state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCamera;

    #[test]
    fn test_set_zoom_reads_back_driver_value() {
        let mut camera = CameraHandle::new(MockCamera::phone().with_zoom(60));
        let state = camera.set_zoom(200).unwrap();
        // Mock clamps to its max, the handle reports what stuck.
        assert_eq!(state.current, 60);
        assert!(state.supported);
        assert_eq!(camera.zoom_state().unwrap().current, 60);
    }
}
