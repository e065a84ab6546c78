use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Lab, Mix, Srgb};

// ---------------------------------------------------------------------------
// Series palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            to_color32(hsl.into_color())
        })
        .collect()
}

/// Same hue, lighter: used for the upper/lower bound lines of a series.
pub fn bound_color(base: Color32) -> Color32 {
    base.gamma_multiply(0.45)
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Sequential scale for the choropleth
// ---------------------------------------------------------------------------

/// Fill for countries with no value.
pub const NO_DATA: Color32 = Color32::from_gray(150);

/// Maps values in `[min, max]` onto a light-to-dark red ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RedScale {
    min: f64,
    max: f64,
}

impl RedScale {
    /// Scale spanning the finite values of `values`; `None` when there are none.
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<Self> {
        let finite = values.into_iter().copied().filter(|v| v.is_finite());
        let (min, max) = finite.fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
        Some(RedScale { min, max })
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Position of `value` on the ramp, clamped to `[0, 1]`.
    pub fn position(&self, value: f64) -> f32 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return 1.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0) as f32
    }

    pub fn color_for(&self, value: Option<f64>) -> Color32 {
        match value {
            Some(v) if v.is_finite() => {
                let light: Lab = Srgb::new(0.996_f32, 0.898, 0.851).into_color();
                let dark: Lab = Srgb::new(0.647_f32, 0.059, 0.082).into_color();
                to_color32(light.mix(dark, self.position(v)).into_color())
            }
            _ => NO_DATA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_length() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn scale_spans_finite_values() {
        let values = [3.0, f64::NAN, 1.0, 5.0];
        let scale = RedScale::from_values(&values).unwrap();
        assert_eq!(scale.range(), (1.0, 5.0));
        assert_eq!(scale.position(3.0), 0.5);
        assert_eq!(scale.position(10.0), 1.0);
        assert!(RedScale::from_values(&[f64::NAN]).is_none());
    }

    #[test]
    fn darker_for_higher_values() {
        let scale = RedScale::from_values(&[0.0, 100.0]).unwrap();
        let low = scale.color_for(Some(0.0));
        let high = scale.color_for(Some(100.0));
        assert!(high.g() < low.g());
        assert_eq!(scale.color_for(None), NO_DATA);
        assert_eq!(scale.color_for(Some(f64::NAN)), NO_DATA);
    }

    #[test]
    fn flat_scale_does_not_divide_by_zero() {
        let scale = RedScale::from_values(&[7.0]).unwrap();
        assert_eq!(scale.position(7.0), 1.0);
    }
}
