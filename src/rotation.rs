use crate::types::{Facing, RotationFrame};
use crate::Result;

// -- Display rotation codes as reported by the windowing system --
pub const SURFACE_ROTATION_0: i32 = 0;
pub const SURFACE_ROTATION_90: i32 = 1;
pub const SURFACE_ROTATION_180: i32 = 2;
pub const SURFACE_ROTATION_270: i32 = 3;

/// Output of [`resolve`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRotation {
    /// Clockwise rotation to apply to the preview and decoded coordinates.
    pub preview: RotationFrame,
    /// Clockwise rotation from the display to the camera sensor.
    pub display_to_camera: RotationFrame,
}

/// Map a display rotation code to degrees.
///
/// Codes 0..=3 are the quarter turns. Some platforms report raw degrees
/// instead (including negative ones like -90); those are accepted if they
/// are right angles.
pub fn display_rotation(code: i32) -> Result<RotationFrame> {
    match code {
        SURFACE_ROTATION_0 => Ok(RotationFrame::DEG_0),
        SURFACE_ROTATION_90 => Ok(RotationFrame::DEG_90),
        SURFACE_ROTATION_180 => Ok(RotationFrame::DEG_180),
        SURFACE_ROTATION_270 => Ok(RotationFrame::DEG_270),
        other => RotationFrame::from_degrees(other),
    }
}

/// Resolve raw degree inputs. Fails with `InvalidRotation` on anything that
/// is not a multiple of 90.
pub fn resolve(
    natural_to_display: i32,
    natural_to_sensor: i32,
    facing: Facing,
) -> Result<ResolvedRotation> {
    let natural_to_display = RotationFrame::from_degrees(natural_to_display)?;
    let natural_to_sensor = RotationFrame::from_degrees(natural_to_sensor)?;
    Ok(resolve_frames(natural_to_display, natural_to_sensor, facing))
}

/// Combine display and sensor mount rotations into the preview rotation.
///
/// Front sensors deliver a mirrored image, so the mount angle is negated
/// before composing and the result negated again for the preview.
pub fn resolve_frames(
    natural_to_display: RotationFrame,
    natural_to_sensor: RotationFrame,
    facing: Facing,
) -> ResolvedRotation {
    let natural_to_sensor = match facing {
        Facing::Front => natural_to_sensor.mirrored(),
        Facing::Back => natural_to_sensor,
    };

    // sensor - display, mod 360
    let display_to_camera = natural_to_sensor.compose(natural_to_display.mirrored());

    let preview = match facing {
        Facing::Front => display_to_camera.mirrored(),
        Facing::Back => display_to_camera,
    };

    ResolvedRotation {
        preview,
        display_to_camera,
    }
}
