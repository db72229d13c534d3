//! # scanzoom - camera calibration and adaptive zoom for code scanning
//!
//! Keeps an optical-code detector fed with codes at a decodable size:
//! - Once per camera open: reconcile display, device and sensor rotations and
//!   pick capture/preview sizes ([`CalibrationSession`])
//! - Parse vendor zoom capability strings into a zoom target ([`capability`])
//! - Per detection: zoom in on codes that look too small, out on codes that
//!   overflow the screen, and drop decodes taken mid-zoom ([`AdaptiveZoomController`])
//! - A decode worker thread tying these together ([`ScanWorker`])
//! - C FFI for the pure calibration functions
//!
//! ## Quick Start
//! ```no_run
//! use scanzoom::{CalibrationSession, CameraHandle, ScanConfig};
//! use scanzoom::mock::MockCamera;
//!
//! let mut camera = CameraHandle::new(MockCamera::phone().with_zoom(100));
//! let mut session = CalibrationSession::calibrate(&mut camera).unwrap();
//! session
//!     .apply_desired_parameters(&mut camera, &ScanConfig::default(), false)
//!     .unwrap();
//! println!("preview: {}", session.current_preview_resolution());
//! ```

pub mod error;
pub mod types;
pub mod rotation;
pub mod resolution;
pub mod capability;
pub mod config;
pub mod driver;
pub mod mock;
pub mod session;
pub mod zoom;
pub mod scan;
pub mod ffi;

pub use error::ScanError;
pub use types::*;
pub use capability::{compute_desired_zoom, DesiredZoom, ZoomCapability};
pub use config::ScanConfig;
pub use driver::{CameraDriver, CameraHandle, Frame, Parameters};
pub use session::CalibrationSession;
pub use zoom::{AdaptiveZoomController, ZoomDecision, ZoomPhase};
pub use scan::{DecodeService, Detection, ScanResult, ScanWorker};

/// Result type alias for scanzoom operations.
pub type Result<T> = std::result::Result<T, ScanError>;
