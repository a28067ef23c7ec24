//! Iso-line extraction (marching squares) for gridded scalar fields.

use log::debug;

use crate::keyrate::KeyRateSurface;

/// Straight piece of an iso-line, endpoints in (efficiency, fidelity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

/// Every segment crossing one contour level.
#[derive(Debug, Clone, PartialEq)]
pub struct IsoLine {
    pub level: f64,
    pub segments: Vec<Segment>,
}

impl IsoLine {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment whose midpoint is closest to the middle of the line's
    /// bounding box; a reasonable anchor for a level label.
    pub fn label_anchor(&self) -> Option<(f64, f64)> {
        let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
        let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for s in &self.segments {
            for (x, y) in [s.start, s.end] {
                x0 = x0.min(x);
                y0 = y0.min(y);
                x1 = x1.max(x);
                y1 = y1.max(y);
            }
        }
        let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
        self.segments
            .iter()
            .map(|s| ((s.start.0 + s.end.0) / 2.0, (s.start.1 + s.end.1) / 2.0))
            .min_by(|a, b| {
                let da = (a.0 - cx).powi(2) + (a.1 - cy).powi(2);
                let db = (b.0 - cx).powi(2) + (b.1 - cy).powi(2);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// Contour a key-rate surface at each of `levels`.
pub fn iso_lines(surface: &KeyRateSurface, levels: &[f64]) -> Vec<IsoLine> {
    iso_lines_on_grid(
        &surface.efficiencies,
        &surface.fidelities,
        surface.values(),
        levels,
    )
}

/// Contour a field given on the grid `xs × ys`, `values[yi * xs.len() + xi]`.
pub fn iso_lines_on_grid(xs: &[f64], ys: &[f64], values: &[f64], levels: &[f64]) -> Vec<IsoLine> {
    levels
        .iter()
        .map(|&level| {
            let segments = march(xs, ys, values, level);
            debug!("level {level}: {} segments", segments.len());
            IsoLine { level, segments }
        })
        .collect()
}

// Corner bits: bottom-left 1, bottom-right 2, top-right 4, top-left 8.
// Edges: 0 bottom, 1 right, 2 top, 3 left.
fn march(xs: &[f64], ys: &[f64], values: &[f64], level: f64) -> Vec<Segment> {
    let nx = xs.len();
    let ny = ys.len();
    let mut segments = Vec::new();
    if nx < 2 || ny < 2 || values.len() < nx * ny {
        return segments;
    }
    let at = |xi: usize, yi: usize| values[yi * nx + xi];

    for yi in 0..ny - 1 {
        for xi in 0..nx - 1 {
            let corners = [
                (xs[xi], ys[yi], at(xi, yi)),
                (xs[xi + 1], ys[yi], at(xi + 1, yi)),
                (xs[xi + 1], ys[yi + 1], at(xi + 1, yi + 1)),
                (xs[xi], ys[yi + 1], at(xi, yi + 1)),
            ];
            if corners.iter().any(|c| !c.2.is_finite()) {
                continue;
            }

            let mut case = 0u8;
            for (bit, c) in corners.iter().enumerate() {
                if c.2 >= level {
                    case |= 1 << bit;
                }
            }

            let centre_above = || corners.iter().map(|c| c.2).sum::<f64>() / 4.0 >= level;
            let pairs: &[(usize, usize)] = match case {
                0 | 15 => &[],
                1 | 14 => &[(3, 0)],
                2 | 13 => &[(0, 1)],
                3 | 12 => &[(3, 1)],
                4 | 11 => &[(1, 2)],
                6 | 9 => &[(0, 2)],
                7 | 8 => &[(3, 2)],
                5 => {
                    if centre_above() {
                        &[(0, 1), (3, 2)]
                    } else {
                        &[(3, 0), (1, 2)]
                    }
                }
                10 => {
                    if centre_above() {
                        &[(3, 0), (1, 2)]
                    } else {
                        &[(0, 1), (3, 2)]
                    }
                }
                _ => &[],
            };

            for &(a, b) in pairs {
                segments.push(Segment {
                    start: edge_point(&corners, a, level),
                    end: edge_point(&corners, b, level),
                });
            }
        }
    }
    segments
}

fn edge_point(corners: &[(f64, f64, f64); 4], edge: usize, level: f64) -> (f64, f64) {
    let (a, b) = match edge {
        0 => (corners[0], corners[1]),
        1 => (corners[1], corners[2]),
        2 => (corners[3], corners[2]),
        _ => (corners[0], corners[3]),
    };
    let dv = b.2 - a.2;
    let t = if dv.abs() < f64::EPSILON {
        0.5
    } else {
        ((level - a.2) / dv).clamp(0.0, 1.0)
    };
    (a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyrate::{key_rate, key_rate_contour};
    use crate::sample::Domain;

    fn grid(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 / (n - 1) as f64).collect()
    }

    #[test]
    fn test_planar_field_lies_on_level_set() {
        let xs = grid(11);
        let ys = grid(11);
        let values: Vec<f64> = ys
            .iter()
            .flat_map(|&y| xs.iter().map(move |&x| x + y))
            .collect();
        let lines = iso_lines_on_grid(&xs, &ys, &values, &[0.5, 1.0, 1.5]);
        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert!(!line.is_empty(), "level {}", line.level);
            for s in &line.segments {
                for (x, y) in [s.start, s.end] {
                    assert!((x + y - line.level).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_level_out_of_range_is_empty() {
        let xs = grid(5);
        let ys = grid(5);
        let values = vec![0.2; 25];
        let lines = iso_lines_on_grid(&xs, &ys, &values, &[0.9]);
        assert!(lines[0].is_empty());
        assert!(lines[0].label_anchor().is_none());
    }

    #[test]
    fn test_saddle_produces_two_segments() {
        let xs = [0.0, 1.0];
        let ys = [0.0, 1.0];
        // Bottom-left and top-right high.
        let values = [1.0, 0.0, 0.0, 1.0];
        let lines = iso_lines_on_grid(&xs, &ys, &values, &[0.5]);
        assert_eq!(lines[0].segments.len(), 2);
    }

    #[test]
    fn test_key_rate_contours_follow_surface() {
        let surface = key_rate_contour(&Domain::reference(), 0.01, 0.201).unwrap();
        let levels = [0.01, 0.05, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        let lines = iso_lines(&surface, &levels);
        for line in &lines {
            assert!(!line.is_empty(), "level {}", line.level);
            for s in &line.segments {
                let (e, f) = s.start;
                assert!((key_rate(e, f, 0.201) - line.level).abs() < 0.02);
            }
        }
    }

    #[test]
    fn test_degenerate_grid_has_no_segments() {
        let lines = iso_lines_on_grid(&[0.0], &[0.0, 1.0], &[0.0, 1.0], &[0.5]);
        assert!(lines[0].is_empty());
    }
}
