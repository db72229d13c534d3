//! C FFI layer for scanzoom.
//!
//! Exposes the pure calibration functions to C/C++ and platform glue code.
//! The generated C header is written to `include/scanzoom.h` by cbindgen.

use crate::capability::{self, CapabilitySnapshot, DesiredZoom};
use crate::error::LastError;
use crate::resolution;
use crate::rotation;
use crate::types::{Facing, Resolution};
use std::ffi::{c_char, c_int, CStr};

/// Thread-safe last error message for C consumers.
static LAST_ERROR: LastError = LastError::new();

/// Returned by `sz_compute_desired_zoom` when the camera declares zoom unsupported.
pub const SZ_NO_ZOOM: c_int = c_int::MIN;

/// Rotation pair in C-compatible layout, in degrees.
#[repr(C)]
pub struct SzRotation {
    /// Clockwise rotation to apply to the preview.
    pub preview: c_int,
    /// Clockwise rotation from display to camera.
    pub display_to_camera: c_int,
}

unsafe fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Resolve display and sensor rotations.
/// `facing`: 0 = front, anything else = back.
///
/// Returns 0 on success, -1 if either input is not a multiple of 90
/// (check `sz_last_error()`), -2 if `out` is null.
///
/// # Safety
/// `out` must point to a writable `SzRotation`, or be null.
#[no_mangle]
pub unsafe extern "C" fn sz_resolve_rotation(
    natural_to_display: c_int,
    natural_to_sensor: c_int,
    facing: c_int,
    out: *mut SzRotation,
) -> c_int {
    if out.is_null() {
        return -2;
    }
    let facing = if facing == 0 { Facing::Front } else { Facing::Back };
    match rotation::resolve(natural_to_display, natural_to_sensor, facing) {
        Ok(r) => {
            out.write(SzRotation {
                preview: r.preview.degrees() as c_int,
                display_to_camera: r.display_to_camera.degrees() as c_int,
            });
            0
        }
        Err(e) => {
            LAST_ERROR.set(&e);
            -1
        }
    }
}

/// Compute the desired zoom in tenths from `count` capability key/value pairs.
///
/// Returns `SZ_NO_ZOOM` if zoom is declared unsupported. Null or non-UTF-8
/// entries are ignored.
///
/// # Safety
/// `keys` and `values` must each point to `count` C string pointers, or be null.
#[no_mangle]
pub unsafe extern "C" fn sz_compute_desired_zoom(
    keys: *const *const c_char,
    values: *const *const c_char,
    count: usize,
    base_tenths: c_int,
) -> c_int {
    let mut snapshot = CapabilitySnapshot::new();
    if !keys.is_null() && !values.is_null() {
        for i in 0..count {
            if let (Some(k), Some(v)) = (c_str(*keys.add(i)), c_str(*values.add(i))) {
                snapshot.insert(k.to_string(), v.to_string());
            }
        }
    }

    match capability::compute_desired_zoom(&snapshot, base_tenths) {
        DesiredZoom::NoZoom => SZ_NO_ZOOM,
        DesiredZoom::Tenths(tenths) => tenths,
    }
}

/// Select the best preview size among `count` supported sizes.
///
/// Returns 0 on success, -1 if there is no usable size, -2 if `out` is null.
///
/// # Safety
/// `sizes` must point to `count` `Resolution` values, or be null.
/// `out` must point to a writable `Resolution`, or be null.
#[no_mangle]
pub unsafe extern "C" fn sz_select_best_preview(
    sizes: *const Resolution,
    count: usize,
    target: Resolution,
    out: *mut Resolution,
) -> c_int {
    if out.is_null() {
        return -2;
    }
    let supported: &[Resolution] = if sizes.is_null() {
        &[]
    } else {
        std::slice::from_raw_parts(sizes, count)
    };

    match resolution::select_best_preview(supported, target) {
        Ok(best) => {
            out.write(best);
            0
        }
        Err(e) => {
            LAST_ERROR.set(&e);
            -1
        }
    }
}

/// Bring a preview size into the screen's portrait/landscape orientation.
#[no_mangle]
pub extern "C" fn sz_preview_on_screen(best_preview: Resolution, screen: Resolution) -> Resolution {
    resolution::preview_on_screen(best_preview, screen)
}

/// Get the last error message, or NULL if no call has failed yet.
/// The returned string is valid until the next FFI call.
#[no_mangle]
pub extern "C" fn sz_last_error() -> *const c_char {
    LAST_ERROR.as_ptr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn test_resolve_rotation_ffi() {
        let mut out = SzRotation {
            preview: -1,
            display_to_camera: -1,
        };
        let rc = unsafe { sz_resolve_rotation(0, 270, 0, &mut out) };
        assert_eq!(rc, 0);
        assert_eq!(out.preview, 270);
        assert_eq!(out.display_to_camera, 90);

        let rc = unsafe { sz_resolve_rotation(30, 0, 1, &mut out) };
        assert_eq!(rc, -1);
        assert!(!sz_last_error().is_null());
    }

    #[test]
    fn test_desired_zoom_ffi() {
        let keys = [CString::new("max-zoom").unwrap(), CString::new("zoom-supported").unwrap()];
        let values = [CString::new("2.0").unwrap(), CString::new("true").unwrap()];
        let key_ptrs: Vec<*const c_char> = keys.iter().map(|k| k.as_ptr()).collect();
        let value_ptrs: Vec<*const c_char> = values.iter().map(|v| v.as_ptr()).collect();

        let tenths = unsafe { sz_compute_desired_zoom(key_ptrs.as_ptr(), value_ptrs.as_ptr(), 2, 27) };
        assert_eq!(tenths, 20);

        let off = CString::new("false").unwrap();
        let value_ptrs = [value_ptrs[0], off.as_ptr()];
        let tenths = unsafe { sz_compute_desired_zoom(key_ptrs.as_ptr(), value_ptrs.as_ptr(), 2, 27) };
        assert_eq!(tenths, SZ_NO_ZOOM);

        let empty = unsafe { sz_compute_desired_zoom(std::ptr::null(), std::ptr::null(), 0, 27) };
        assert_eq!(empty, 27);
    }

    #[test]
    fn test_select_best_preview_ffi() {
        let sizes = [Resolution::new(640, 480), Resolution::new(1920, 1080)];
        let mut out = Resolution::default();
        let rc = unsafe {
            sz_select_best_preview(sizes.as_ptr(), sizes.len(), Resolution::new(1080, 1920), &mut out)
        };
        assert_eq!(rc, 0);
        assert_eq!(out, Resolution::new(1920, 1080));
        assert_eq!(
            sz_preview_on_screen(out, Resolution::new(1080, 1920)),
            Resolution::new(1080, 1920)
        );

        let rc = unsafe { sz_select_best_preview(std::ptr::null(), 0, Resolution::new(1, 1), &mut out) };
        assert_eq!(rc, -1);
    }
}
