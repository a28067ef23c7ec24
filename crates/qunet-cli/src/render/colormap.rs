//! Colour maps and count → colour scaling.

use plotters::style::RGBColor;
use qunet_core::Colormap;

type Anchor = (f64, [f64; 3]);

const HOT: &[Anchor] = &[
    (0.0, [0.0416, 0.0, 0.0]),
    (0.365, [1.0, 0.0, 0.0]),
    (0.746, [1.0, 1.0, 0.0]),
    (1.0, [1.0, 1.0, 1.0]),
];

const PLASMA: &[Anchor] = &[
    (0.0, [0.050, 0.030, 0.528]),
    (0.25, [0.494, 0.012, 0.658]),
    (0.5, [0.798, 0.280, 0.470]),
    (0.75, [0.973, 0.585, 0.253]),
    (1.0, [0.940, 0.975, 0.131]),
];

const COOL: &[Anchor] = &[(0.0, [0.0, 1.0, 1.0]), (1.0, [1.0, 0.0, 1.0])];

fn anchors(map: Colormap) -> &'static [Anchor] {
    match map {
        Colormap::Hot => HOT,
        Colormap::Plasma => PLASMA,
        Colormap::Cool => COOL,
    }
}

/// Colour at `t` in [0, 1], clamped, linearly interpolated between anchors.
pub fn color_at(map: Colormap, t: f64) -> RGBColor {
    let stops = anchors(map);
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let mut rgb = stops[stops.len() - 1].1;
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let w = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            rgb = [
                c0[0] + w * (c1[0] - c0[0]),
                c0[1] + w * (c1[1] - c0[1]),
                c0[2] + w * (c1[2] - c0[2]),
            ];
            break;
        }
    }
    RGBColor(to_u8(rgb[0]), to_u8(rgb[1]), to_u8(rgb[2]))
}

fn to_u8(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Maps values onto [0, 1] linearly or logarithmically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
    pub log: bool,
}

impl ColorScale {
    pub fn linear(max: f64) -> Self {
        Self {
            min: 0.0,
            max,
            log: false,
        }
    }

    /// Log scale over `[min, max]`; `min` must be positive.
    pub fn log(min: f64, max: f64) -> Self {
        Self {
            min: min.max(f64::MIN_POSITIVE),
            max,
            log: true,
        }
    }

    pub fn normalize(&self, v: f64) -> f64 {
        if self.log {
            if v <= 0.0 {
                return 0.0;
            }
            let span = self.max.ln() - self.min.ln();
            if span <= 0.0 {
                return 0.0;
            }
            (v.ln() - self.min.ln()) / span
        } else {
            let span = self.max - self.min;
            if span <= 0.0 {
                return 0.0;
            }
            (v - self.min) / span
        }
    }

    /// Inverse of [`normalize`](Self::normalize), for colour-bar labels.
    pub fn value_at(&self, t: f64) -> f64 {
        if self.log {
            (self.min.ln() + t * (self.max.ln() - self.min.ln())).exp()
        } else {
            self.min + t * (self.max - self.min)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hot_endpoints() {
        assert_eq!(color_at(Colormap::Hot, 1.0), RGBColor(255, 255, 255));
        assert_eq!(color_at(Colormap::Hot, 0.365), RGBColor(255, 0, 0));
        let low = color_at(Colormap::Hot, 0.0);
        assert!(low.0 < 20 && low.1 == 0 && low.2 == 0);
    }

    #[test]
    fn test_cool_midpoint() {
        assert_eq!(color_at(Colormap::Cool, 0.5), RGBColor(128, 128, 255));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(color_at(Colormap::Plasma, -3.0), color_at(Colormap::Plasma, 0.0));
        assert_eq!(color_at(Colormap::Plasma, 7.0), color_at(Colormap::Plasma, 1.0));
        assert_eq!(color_at(Colormap::Plasma, f64::NAN), color_at(Colormap::Plasma, 0.0));
    }

    #[test]
    fn test_log_scale_round_trip() {
        let s = ColorScale::log(1.0, 1000.0);
        assert!((s.normalize(1.0)).abs() < 1e-12);
        assert!((s.normalize(1000.0) - 1.0).abs() < 1e-12);
        assert!((s.normalize(31.622_776_601_683_79) - 0.5).abs() < 1e-9);
        assert!((s.value_at(0.5) - 31.622_776_601_683_79).abs() < 1e-6);
        assert_eq!(s.normalize(0.0), 0.0);
    }

    #[test]
    fn test_degenerate_scales() {
        assert_eq!(ColorScale::linear(0.0).normalize(0.0), 0.0);
        assert_eq!(ColorScale::log(5.0, 5.0).normalize(5.0), 0.0);
    }
}
