use crate::capability::{self, DesiredZoom, ZoomCapability};
use crate::config::ScanConfig;
use crate::driver::{CameraDriver, CameraHandle};
use crate::resolution;
use crate::rotation;
use crate::types::{CalibrationState, FramingRect, PreviewSize, Resolution};
use crate::Result;

/// Per-open calibration of one camera.
///
/// Must be rebuilt on every open: display rotation and supported sizes can
/// change while the camera is closed.
#[derive(Debug, Clone)]
pub struct CalibrationSession {
    state: CalibrationState,
    capability: ZoomCapability,
    framing_rect: Option<FramingRect>,
}

impl CalibrationSession {
    /// Read orientation, sizes and zoom capabilities from the camera once.
    ///
    /// Fails with `InvalidRotation` or `NoSupportedResolution`; the session
    /// must not proceed in either case.
    pub fn calibrate<D: CameraDriver>(camera: &mut CameraHandle<D>) -> Result<CalibrationSession> {
        let display = camera.display_info();
        let sensor = camera.sensor_info();

        let natural_to_display = rotation::display_rotation(display.rotation)?;
        log::info!("Display at: {}", natural_to_display);
        log::info!("Camera at: {}° ({:?})", sensor.mount_rotation, sensor.facing);

        let resolved = rotation::resolve(
            natural_to_display.degrees() as i32,
            sensor.mount_rotation,
            sensor.facing,
        )?;
        log::info!(
            "Display to camera: {}, needed preview rotation: {}",
            resolved.display_to_camera,
            resolved.preview
        );

        let screen = display.screen;
        log::info!("Screen resolution in current orientation: {}", screen);

        let params = camera.parameters()?;
        let supported = &params.supported_preview_sizes;

        let capture = resolution::select_capture_resolution(supported, screen)?;
        log::info!("Camera resolution: {}", capture);

        let best_preview = resolution::select_best_preview(supported, screen)?;
        log::info!("Best available preview size: {}", best_preview);

        let on_screen = resolution::preview_on_screen(best_preview, screen);
        log::info!("Preview size on screen: {}", on_screen);

        let capability = ZoomCapability::from_snapshot(&camera.capability_snapshot()?);

        Ok(CalibrationSession {
            state: CalibrationState {
                needed_preview_rotation: resolved.preview,
                display_to_camera_rotation: resolved.display_to_camera,
                screen_resolution: screen,
                camera_capture_resolution: capture,
                best_preview: PreviewSize::new(best_preview),
                preview_resolution_on_screen: on_screen,
            },
            capability,
            framing_rect: None,
        })
    }

    /// Push the calibrated preview size, preferences and initial zoom to the camera.
    ///
    /// Reads the configuration back afterwards; if the driver silently chose
    /// another preview size, that size becomes the confirmed one.
    pub fn apply_desired_parameters<D: CameraDriver>(
        &mut self,
        camera: &mut CameraHandle<D>,
        config: &ScanConfig,
        safe_mode: bool,
    ) -> Result<()> {
        let mut params = camera.parameters()?;
        if safe_mode {
            log::warn!("In camera config safe mode -- most settings will not be honored");
        }

        params.options = config.camera_options(safe_mode);
        let requested = self.state.best_preview.requested;
        params.preview_size = Some(requested);

        match (self.desired_zoom(), params.zoom_supported) {
            (DesiredZoom::Tenths(tenths), true) if tenths > 0 => {
                params.zoom = params.max_zoom / tenths as u32;
                log::info!(
                    "Initial zoom {} (max {}, desired {} tenths)",
                    params.zoom,
                    params.max_zoom,
                    tenths
                );
            }
            (DesiredZoom::Tenths(_), true) => {}
            (DesiredZoom::NoZoom, _) => log::info!("Capabilities declare zoom unsupported"),
            (_, false) => log::warn!("Unsupported zoom."),
        }

        let applied = camera.apply(&params)?;
        camera.set_display_orientation(self.state.display_to_camera_rotation)?;

        if let Some(actual) = applied.preview_size {
            if self.state.best_preview.confirm(actual) {
                log::warn!(
                    "Camera said it supported preview size {}, but after setting it, preview size is {}",
                    requested,
                    actual
                );
            }
        }
        Ok(())
    }

    pub fn state(&self) -> &CalibrationState {
        &self.state
    }

    /// Preview size last confirmed by the camera.
    pub fn current_preview_resolution(&self) -> Resolution {
        self.state.best_preview_resolution()
    }

    pub fn zoom_capability(&self) -> &ZoomCapability {
        &self.capability
    }

    pub fn desired_zoom(&self) -> DesiredZoom {
        self.capability
            .desired_zoom(capability::DEFAULT_DESIRED_TENTHS)
    }

    pub fn framing_rect(&self) -> Option<FramingRect> {
        self.framing_rect
    }

    pub fn set_framing_rect(&mut self, rect: FramingRect) {
        self.framing_rect = Some(rect);
    }

    /// Center a `width` x `height` framing rectangle on the screen.
    pub fn set_manual_framing_rect(&mut self, width: u32, height: u32) {
        let rect = FramingRect::centered(self.state.screen_resolution, width, height);
        log::debug!("Calculated manual framing rect: {:?}", rect);
        self.framing_rect = Some(rect);
    }
}
