use crate::types::Resolution;
use crate::{Result, ScanError};
use std::cmp::Ordering;

/// Pick the supported size that best fits `target`.
///
/// Closest aspect ratio wins. Among equal aspect ratios, a size that fits
/// inside the target area beats one that exceeds it, then the smaller area
/// difference wins. Complete ties go to the first size in `supported`.
/// Aspect ratios are compared long-edge over short-edge, so a landscape
/// enumeration still matches a portrait target.
pub fn select_best_preview(supported: &[Resolution], target: Resolution) -> Result<Resolution> {
    supported
        .iter()
        .copied()
        .filter(|r| r.width > 0 && r.height > 0)
        .min_by(|a, b| {
            compare_aspect_distance(*a, *b, target).then_with(|| compare_area_fit(*a, *b, target))
        })
        .ok_or(ScanError::NoSupportedResolution)
}

/// Capture size: the target is turned landscape first, since sensor drivers
/// usually only enumerate landscape sizes.
pub fn select_capture_resolution(supported: &[Resolution], screen: Resolution) -> Result<Resolution> {
    select_best_preview(supported, screen.landscape())
}

/// Bring a selected preview size into the screen's orientation.
pub fn preview_on_screen(best_preview: Resolution, screen: Resolution) -> Resolution {
    if best_preview.is_portrait() == screen.is_portrait() {
        best_preview
    } else {
        best_preview.swapped()
    }
}

fn long_short(r: Resolution) -> (u128, u128) {
    let long = r.width.max(r.height) as u128;
    let short = r.width.min(r.height) as u128;
    (long, short)
}

/// Compare |aspect(a) - aspect(t)| against |aspect(b) - aspect(t)| exactly,
/// by cross-multiplying instead of dividing.
fn compare_aspect_distance(a: Resolution, b: Resolution, target: Resolution) -> Ordering {
    let (tl, ts) = long_short(target);
    let (al, as_) = long_short(a);
    let (bl, bs) = long_short(b);
    let ts = ts.max(1);

    // |al/as - tl/ts| = |al*ts - tl*as| / (as*ts)
    let da = (al * ts).abs_diff(tl * as_);
    let db = (bl * ts).abs_diff(tl * bs);
    (da * bs).cmp(&(db * as_))
}

fn compare_area_fit(a: Resolution, b: Resolution, target: Resolution) -> Ordering {
    let t = target.area();
    let key = |r: Resolution| {
        let area = r.area();
        (area > t, area.abs_diff(t))
    };
    key(a).cmp(&key(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(list: &[(u32, u32)]) -> Vec<Resolution> {
        list.iter().map(|&(w, h)| Resolution::new(w, h)).collect()
    }

    #[test]
    fn test_empty_is_hard_failure() {
        let err = select_best_preview(&[], Resolution::new(1920, 1080)).unwrap_err();
        assert!(matches!(err, ScanError::NoSupportedResolution));
        assert!(err.is_configuration_error());

        let degenerate = sizes(&[(0, 0), (640, 0)]);
        assert!(select_best_preview(&degenerate, Resolution::new(640, 480)).is_err());
    }

    #[test]
    fn test_prefers_aspect_then_area() {
        let supported = sizes(&[(640, 480), (1280, 720), (1920, 1080), (2560, 1440), (1600, 1200)]);
        let best = select_best_preview(&supported, Resolution::new(1920, 1080)).unwrap();
        assert_eq!(best, Resolution::new(1920, 1080));

        // No exact area match: stay under the target rather than exceed it.
        let best = select_best_preview(&supported, Resolution::new(2000, 1125)).unwrap();
        assert_eq!(best, Resolution::new(1920, 1080));
    }

    #[test]
    fn test_exceeds_target_only_when_nothing_fits() {
        let supported = sizes(&[(2560, 1440), (3840, 2160)]);
        let best = select_best_preview(&supported, Resolution::new(1920, 1080)).unwrap();
        assert_eq!(best, Resolution::new(2560, 1440));
    }

    #[test]
    fn test_portrait_target_matches_landscape_sizes() {
        let supported = sizes(&[(640, 480), (1920, 1080)]);
        let best = select_best_preview(&supported, Resolution::new(1080, 1920)).unwrap();
        assert_eq!(best, Resolution::new(1920, 1080));
    }

    #[test]
    fn test_first_wins_complete_tie() {
        let supported = sizes(&[(1080, 1920), (1920, 1080)]);
        let best = select_best_preview(&supported, Resolution::new(1920, 1080)).unwrap();
        assert_eq!(best, Resolution::new(1080, 1920));
    }

    #[test]
    fn test_capture_resolution_uses_landscape_target() {
        let supported = sizes(&[(1280, 720), (1920, 1080)]);
        let best = select_capture_resolution(&supported, Resolution::new(1080, 1920)).unwrap();
        assert_eq!(best, Resolution::new(1920, 1080));
    }

    #[test]
    fn test_preview_on_screen_swaps_to_screen_orientation() {
        let screen = Resolution::new(1080, 1920);
        let best = Resolution::new(1920, 1080);
        assert_eq!(preview_on_screen(best, screen), Resolution::new(1080, 1920));

        let landscape_screen = Resolution::new(1920, 1080);
        assert_eq!(preview_on_screen(best, landscape_screen), best);
    }
}
