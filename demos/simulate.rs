//! Run the decode worker against a simulated camera whose code starts small.
//!
//! Usage: RUST_LOG=debug cargo run --example simulate

use scanzoom::mock::MockCamera;
use scanzoom::{
    CalibrationSession, CameraHandle, DecodeService, Detection, DetectionGeometry, Frame, Point,
    ScanConfig,
};
use std::time::Duration;

/// Reports a code whose apparent width grows on every attempt, as if the
/// lens were zooming in on it.
struct FakeDecoder {
    base_width: f32,
    attempts: u32,
}

impl DecodeService for FakeDecoder {
    type Payload = String;

    fn decode(&mut self, frame: &Frame) -> Option<Detection<String>> {
        self.attempts += 1;
        let width = self.base_width * (1.0 + self.attempts as f32 * 0.3);
        Some(Detection {
            geometry: DetectionGeometry::new(vec![Point::new(0.0, 0.0), Point::new(width, 0.0)]),
            payload: format!("frame {} width {:.0}px", frame.sequence, width),
        })
    }
}

fn main() {
    env_logger::init();

    let config = ScanConfig::default();
    let mut camera = CameraHandle::new(MockCamera::phone().with_zoom(100));
    let mut session = match CalibrationSession::calibrate(&mut camera) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Calibration failed: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = session.apply_desired_parameters(&mut camera, &config, false) {
        eprintln!("Failed to configure camera: {}", e);
        std::process::exit(1);
    }
    session.set_manual_framing_rect(720, 720);

    println!("Preview: {}", session.current_preview_resolution());

    let decoder = FakeDecoder {
        base_width: 60.0,
        attempts: 0,
    };
    let worker = match scanzoom::ScanWorker::start(camera, session, decoder, &config) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Failed to start worker: {}", e);
            std::process::exit(1);
        }
    };

    match worker.recv_timeout(Duration::from_secs(2)) {
        Ok(result) => println!(
            "Accepted {} after {} zoom adjustments",
            result.payload, result.discarded
        ),
        Err(e) => eprintln!("Error: {}", e),
    }

    if let Some(mut camera) = worker.stop() {
        match camera.zoom_state() {
            Ok(zoom) => println!("Final zoom: {}/{}", zoom.current, zoom.max),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}
