//! Normalizes authoring paints to device RGB.
//!
//! CMYK conversion is the naive `(1 - c) * (1 - k)` formula, not color
//! managed. Gradients collapse to their first stop.

use labelpress_types::{Paint, Rgb};

/// Resolves a paint to a device RGB triple, or `None` for "no paint".
pub fn resolve(paint: Option<&Paint>) -> Option<Rgb> {
    match paint? {
        Paint::None | Paint::Unsupported => None,
        Paint::Rgb { r, g, b } => Some(Rgb::new(r / 255.0, g / 255.0, b / 255.0)),
        Paint::Cmyk { c, m, y, k } => {
            let key = 1.0 - k / 100.0;
            Some(Rgb::new((1.0 - c / 100.0) * key, (1.0 - m / 100.0) * key, (1.0 - y / 100.0) * key))
        }
        Paint::Spot { fallback, .. } => resolve(fallback.as_deref()),
        Paint::Gradient { stops } => resolve(stops.first().and_then(|stop| stop.color.as_ref())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelpress_types::GradientStop;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-9 && (a.g - b.g).abs() < 1e-9 && (a.b - b.b).abs() < 1e-9
    }

    #[test]
    fn test_none_and_missing_resolve_to_no_paint() {
        assert_eq!(resolve(None), None);
        assert_eq!(resolve(Some(&Paint::None)), None);
        assert_eq!(resolve(Some(&Paint::Unsupported)), None);
    }

    #[test]
    fn test_rgb_scales_to_unit_range() {
        let c = resolve(Some(&Paint::Rgb { r: 255.0, g: 0.0, b: 51.0 })).unwrap();
        assert!(close(c, Rgb::new(1.0, 0.0, 0.2)));
    }

    #[test]
    fn test_cmyk_uses_naive_conversion() {
        let c = resolve(Some(&Paint::Cmyk { c: 0.0, m: 100.0, y: 50.0, k: 20.0 })).unwrap();
        assert!(close(c, Rgb::new(0.8, 0.0, 0.4)));

        let black = resolve(Some(&Paint::Cmyk { c: 0.0, m: 0.0, y: 0.0, k: 100.0 })).unwrap();
        assert!(close(black, Rgb::BLACK));
    }

    #[test]
    fn test_spot_resolves_through_fallback() {
        let spot = Paint::Spot {
            name: Some("PMS 485".into()),
            fallback: Some(Box::new(Paint::Rgb { r: 0.0, g: 255.0, b: 0.0 })),
        };
        assert!(close(resolve(Some(&spot)).unwrap(), Rgb::new(0.0, 1.0, 0.0)));

        let bare = Paint::Spot { name: None, fallback: None };
        assert_eq!(resolve(Some(&bare)), None);
    }

    #[test]
    fn test_gradient_takes_first_stop() {
        let gradient = Paint::Gradient {
            stops: vec![
                GradientStop { offset: 0.0, color: Some(Paint::Rgb { r: 0.0, g: 0.0, b: 255.0 }) },
                GradientStop { offset: 1.0, color: Some(Paint::Rgb { r: 255.0, g: 0.0, b: 0.0 }) },
            ],
        };
        assert!(close(resolve(Some(&gradient)).unwrap(), Rgb::new(0.0, 0.0, 1.0)));
        assert_eq!(resolve(Some(&Paint::Gradient { stops: vec![] })), None);
    }
}
