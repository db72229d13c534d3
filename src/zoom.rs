use crate::driver::{CameraDriver, CameraHandle};
use crate::types::{CalibrationState, DetectionGeometry, FramingRect, ZoomState};
use crate::Result;

/// Zoom indices moved per adjustment.
pub const ZOOM_STEP: u32 = 10;

/// What the last evaluation did to the lens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoomPhase {
    #[default]
    Stable,
    ZoomingIn,
    ZoomingOut,
}

/// Verdict on one positive detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDecision {
    /// The decode stands.
    Accept,
    /// Zoom was changed; the geometry is stale and the decode must be dropped.
    DiscardAndRetry,
}

/// Zoom index to move to when the code looks too small.
pub fn zoom_in_target(current: u32, max: u32) -> u32 {
    if current == 0 {
        max / 2
    } else if current.saturating_add(ZOOM_STEP) <= max {
        current + ZOOM_STEP
    } else {
        max
    }
}

/// Zoom index to move to when the code looks too large.
pub fn zoom_out_target(current: u32, max: u32) -> u32 {
    if current >= max {
        max / 2
    } else if current >= ZOOM_STEP {
        current - ZOOM_STEP
    } else {
        0
    }
}

/// Decide on an adjustment from measured sizes alone.
///
/// `code_width` is in sensor pixels while `screen_width` is in display
/// pixels; the zoom-out comparison mixes the two without conversion.
pub fn plan_adjustment(
    code_width: u32,
    frame_width: i32,
    screen_width: u32,
    zoom: ZoomState,
) -> Option<(u32, ZoomPhase)> {
    if (code_width as i64) <= (frame_width / 4) as i64 {
        Some((zoom_in_target(zoom.current, zoom.max), ZoomPhase::ZoomingIn))
    } else if code_width > screen_width {
        Some((zoom_out_target(zoom.current, zoom.max), ZoomPhase::ZoomingOut))
    } else {
        None
    }
}

/// Coarse proportional zoom control driven by detected code size.
///
/// Runs once per positive detection. Zoom support and limits are read from
/// the camera on every call and never cached between calls.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveZoomController {
    phase: ZoomPhase,
    last_zoom: Option<ZoomState>,
}

impl AdaptiveZoomController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ZoomPhase {
        self.phase
    }

    /// Zoom state read back after the most recent write.
    pub fn last_zoom(&self) -> Option<ZoomState> {
        self.last_zoom
    }

    /// Evaluate one detection and adjust zoom if the code is out of range.
    ///
    /// Fails open: without a framing rectangle, with unsupported zoom, or
    /// with fewer than two points the decode is accepted untouched.
    pub fn evaluate_detection<D: CameraDriver>(
        &mut self,
        camera: &mut CameraHandle<D>,
        geometry: &DetectionGeometry,
        calibration: &CalibrationState,
        framing: Option<FramingRect>,
    ) -> Result<ZoomDecision> {
        let Some(code_width) = geometry.apparent_width() else {
            return Ok(self.settle());
        };
        let Some(framing) = framing else {
            log::trace!("No framing rect yet, skipping auto zoom");
            return Ok(self.settle());
        };

        let zoom = camera.zoom_state()?;
        if !zoom.supported {
            return Ok(self.settle());
        }

        let screen_width = calibration.screen_resolution().width;
        let Some((target, phase)) = plan_adjustment(code_width, framing.width(), screen_width, zoom)
        else {
            return Ok(self.settle());
        };

        let after = camera.set_zoom(target)?;
        log::debug!(
            "Code width {}px (frame {}px): {:?} zoom {} -> {} (requested {})",
            code_width,
            framing.width(),
            phase,
            zoom.current,
            after.current,
            target
        );
        self.phase = phase;
        self.last_zoom = Some(after);
        Ok(ZoomDecision::DiscardAndRetry)
    }

    fn settle(&mut self) -> ZoomDecision {
        self.phase = ZoomPhase::Stable;
        ZoomDecision::Accept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCamera;
    use crate::session::CalibrationSession;
    use crate::types::Point;

    const FRAME: i32 = 600;

    fn geometry(width: f32) -> DetectionGeometry {
        DetectionGeometry::new(vec![Point::new(10.0, 10.0), Point::new(10.0 + width, 10.0)])
    }

    fn setup(driver: MockCamera) -> (CameraHandle<MockCamera>, CalibrationSession) {
        let mut camera = CameraHandle::new(driver);
        let mut session = CalibrationSession::calibrate(&mut camera).unwrap();
        session.set_manual_framing_rect(FRAME as u32, FRAME as u32);
        (camera, session)
    }

    fn evaluate(
        controller: &mut AdaptiveZoomController,
        camera: &mut CameraHandle<MockCamera>,
        session: &CalibrationSession,
        width: f32,
    ) -> ZoomDecision {
        controller
            .evaluate_detection(camera, &geometry(width), session.state(), session.framing_rect())
            .unwrap()
    }

    #[test]
    fn test_zoom_targets() {
        assert_eq!(zoom_in_target(0, 100), 50);
        assert_eq!(zoom_in_target(50, 100), 60);
        assert_eq!(zoom_in_target(90, 100), 100);
        assert_eq!(zoom_in_target(95, 100), 100);
        assert_eq!(zoom_in_target(u32::MAX - 3, u32::MAX), u32::MAX);

        assert_eq!(zoom_out_target(100, 100), 50);
        assert_eq!(zoom_out_target(50, 100), 40);
        assert_eq!(zoom_out_target(10, 100), 0);
        assert_eq!(zoom_out_target(4, 100), 0);
    }

    #[test]
    fn test_small_code_zooms_in_from_zero() {
        let (mut camera, session) = setup(MockCamera::phone().with_zoom(100));
        let mut controller = AdaptiveZoomController::new();

        let decision = evaluate(&mut controller, &mut camera, &session, FRAME as f32 / 5.0);
        assert_eq!(decision, ZoomDecision::DiscardAndRetry);
        assert_eq!(controller.phase(), ZoomPhase::ZoomingIn);
        assert_eq!(camera.zoom_state().unwrap().current, 50);
        assert_eq!(controller.last_zoom().unwrap().current, 50);
    }

    #[test]
    fn test_quarter_width_boundary_is_too_small() {
        let (mut camera, session) = setup(MockCamera::phone().with_zoom(100).with_current_zoom(20));
        let mut controller = AdaptiveZoomController::new();

        let decision = evaluate(&mut controller, &mut camera, &session, FRAME as f32 / 4.0);
        assert_eq!(decision, ZoomDecision::DiscardAndRetry);
        assert_eq!(camera.zoom_state().unwrap().current, 30);

        let decision = evaluate(&mut controller, &mut camera, &session, FRAME as f32 / 4.0 + 1.0);
        assert_eq!(decision, ZoomDecision::Accept);
        assert_eq!(controller.phase(), ZoomPhase::Stable);
    }

    #[test]
    fn test_oversized_code_zooms_out() {
        let (mut camera, session) = setup(MockCamera::phone().with_zoom(100).with_current_zoom(100));
        let mut controller = AdaptiveZoomController::new();
        let screen_width = session.state().screen_resolution().width as f32;

        let decision = evaluate(&mut controller, &mut camera, &session, screen_width + 5.0);
        assert_eq!(decision, ZoomDecision::DiscardAndRetry);
        assert_eq!(controller.phase(), ZoomPhase::ZoomingOut);
        assert_eq!(camera.zoom_state().unwrap().current, 50);

        evaluate(&mut controller, &mut camera, &session, screen_width + 5.0);
        assert_eq!(camera.zoom_state().unwrap().current, 40);
    }

    #[test]
    fn test_well_sized_code_is_accepted() {
        let (mut camera, session) = setup(MockCamera::phone().with_zoom(100).with_current_zoom(30));
        let mut controller = AdaptiveZoomController::new();

        let decision = evaluate(&mut controller, &mut camera, &session, 400.0);
        assert_eq!(decision, ZoomDecision::Accept);
        assert_eq!(controller.phase(), ZoomPhase::Stable);
        assert!(camera.driver().zoom_writes().is_empty());
    }

    #[test]
    fn test_unsupported_zoom_always_accepts() {
        let (mut camera, session) = setup(MockCamera::phone());
        let mut controller = AdaptiveZoomController::new();

        for width in [1.0, 150.0, 400.0, 5000.0] {
            assert_eq!(
                evaluate(&mut controller, &mut camera, &session, width),
                ZoomDecision::Accept
            );
        }
        assert!(camera.driver().zoom_writes().is_empty());
    }

    #[test]
    fn test_missing_framing_rect_accepts() {
        let mut camera = CameraHandle::new(MockCamera::phone().with_zoom(100));
        let session = CalibrationSession::calibrate(&mut camera).unwrap();
        let mut controller = AdaptiveZoomController::new();

        let decision = controller
            .evaluate_detection(&mut camera, &geometry(5.0), session.state(), None)
            .unwrap();
        assert_eq!(decision, ZoomDecision::Accept);
        assert!(camera.driver().zoom_writes().is_empty());
    }

    #[test]
    fn test_single_point_geometry_accepts() {
        let (mut camera, session) = setup(MockCamera::phone().with_zoom(100));
        let mut controller = AdaptiveZoomController::new();
        let single = DetectionGeometry::new(vec![Point::new(1.0, 1.0)]);

        let decision = controller
            .evaluate_detection(&mut camera, &single, session.state(), session.framing_rect())
            .unwrap();
        assert_eq!(decision, ZoomDecision::Accept);
    }

    #[test]
    fn test_zoom_state_is_read_fresh_each_call() {
        let (mut camera, session) = setup(MockCamera::phone().with_zoom(100));
        let mut controller = AdaptiveZoomController::new();

        evaluate(&mut controller, &mut camera, &session, 10.0);
        assert_eq!(camera.zoom_state().unwrap().current, 50);

        // External manual zoom between detections.
        camera.set_zoom(95).unwrap();
        evaluate(&mut controller, &mut camera, &session, 10.0);
        assert_eq!(camera.zoom_state().unwrap().current, 100);
        assert_eq!(camera.driver().zoom_writes(), &[50, 95, 100]);
    }

    #[test]
    fn test_plan_adjustment_pure() {
        let zoom = ZoomState {
            supported: true,
            current: 0,
            max: 100,
        };
        assert_eq!(
            plan_adjustment(120, 600, 1080, zoom),
            Some((50, ZoomPhase::ZoomingIn))
        );
        assert_eq!(plan_adjustment(300, 600, 1080, zoom), None);
    }
}
