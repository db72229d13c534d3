//! Print the calibration a simulated phone would get in every display rotation.
//!
//! Usage: RUST_LOG=info cargo run --example calibrate

use scanzoom::driver::{DisplayInfo, SensorInfo};
use scanzoom::mock::MockCamera;
use scanzoom::{CalibrationSession, CameraHandle, Facing, Resolution};

fn main() {
    env_logger::init();

    for facing in [Facing::Back, Facing::Front] {
        for rotation in 0..4 {
            let screen = if rotation % 2 == 0 {
                Resolution::new(1080, 1920)
            } else {
                Resolution::new(1920, 1080)
            };
            let driver = MockCamera::new(
                SensorInfo {
                    mount_rotation: if facing == Facing::Back { 90 } else { 270 },
                    facing,
                },
                DisplayInfo { rotation, screen },
            )
            .with_supported_sizes(&[(640, 480), (1280, 720), (1920, 1080)]);

            let mut camera = CameraHandle::new(driver);
            match CalibrationSession::calibrate(&mut camera) {
                Ok(session) => {
                    let s = session.state();
                    println!(
                        "{:?} display={:<3}  preview rot={:<4}  display->camera={:<4}  capture={}  on-screen={}",
                        facing,
                        rotation * 90,
                        s.needed_preview_rotation(),
                        s.display_to_camera_rotation(),
                        s.camera_capture_resolution(),
                        s.preview_resolution_on_screen(),
                    );
                }
                Err(e) => {
                    eprintln!("Calibration failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
