use std::fmt;

/// Errors that can occur while calibrating or driving the scanning camera.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Invalid rotation: {0} degrees is not a multiple of 90")]
    InvalidRotation(i32),

    #[error("Camera reported no supported preview resolutions")]
    NoSupportedResolution,

    #[error("Camera driver error: {0}")]
    Driver(String),

    #[error("Failed to spawn scan worker: {0}")]
    WorkerSpawn(String),

    #[error("Scan worker stopped")]
    StreamStopped,

    #[error("Timeout waiting for a decode result")]
    Timeout,
}

impl ScanError {
    /// Errors that must stop the camera session from proceeding.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ScanError::InvalidRotation(_) | ScanError::NoSupportedResolution
        )
    }
}

/// A vendor capability value that could not be parsed.
///
/// Never propagated: the offending rule is skipped and the value logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityParseError {
    pub key: &'static str,
    pub value: String,
}

impl fmt::Display for CapabilityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bad {}: {:?}", self.key, self.value)
    }
}

impl std::error::Error for CapabilityParseError {}

/// Thread-safe last-error storage for the C FFI layer.
pub(crate) struct LastError {
    message: std::sync::Mutex<String>,
}

impl LastError {
    pub const fn new() -> Self {
        Self {
            message: std::sync::Mutex::new(String::new()),
        }
    }

    pub fn set(&self, err: &ScanError) {
        if let Ok(mut msg) = self.message.lock() {
            *msg = fmt::format(format_args!("{}\0", err));
        }
    }

    pub fn as_ptr(&self) -> *const std::ffi::c_char {
        match self.message.lock() {
            Ok(msg) if !msg.is_empty() => msg.as_ptr() as *const std::ffi::c_char,
            _ => std::ptr::null(),
        }
    }
}
