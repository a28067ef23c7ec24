//! Samples and the rectangular (efficiency, fidelity) domain they live in.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest number of points allowed along one grid axis.
pub const MAX_AXIS_POINTS: usize = 1_000_000;

/// Largest number of cells allowed in a 2D grid.
pub const MAX_GRID_CELLS: usize = 16_000_000;

/// Reject an `nx × ny` grid that would exceed [`MAX_GRID_CELLS`].
pub(crate) fn check_grid_cells(nx: usize, ny: usize) -> Result<usize> {
    nx.checked_mul(ny)
        .filter(|&cells| cells <= MAX_GRID_CELLS)
        .ok_or_else(|| {
            Error::InvalidParameter(format!(
                "{nx}x{ny} grid exceeds {MAX_GRID_CELLS} cells"
            ))
        })
}

/// One simulated end-to-end trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Fraction of attempted transmissions that succeeded, nominally [0, 1].
    pub efficiency: f64,
    /// Quality of the delivered state, nominally [0.5, 1].
    pub fidelity: f64,
}

impl Sample {
    pub fn new(efficiency: f64, fidelity: f64) -> Self {
        Self {
            efficiency,
            fidelity,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.efficiency.is_finite() && self.fidelity.is_finite()
    }
}

/// Closed interval `[min, max]` along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(Error::InvalidParameter(format!(
                "range [{min}, {max}] must be finite with min < max"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// Half-open arange-style points `min, min+step, ... < max`.
    ///
    /// Fails before allocating when the axis would exceed
    /// [`MAX_AXIS_POINTS`].
    pub(crate) fn arange(&self, step: f64) -> Result<Vec<f64>> {
        let n = (self.span() / step).ceil().max(0.0);
        if !n.is_finite() || n > MAX_AXIS_POINTS as f64 {
            return Err(Error::InvalidParameter(format!(
                "step {step} over [{}, {}] gives more than {MAX_AXIS_POINTS} points",
                self.min, self.max
            )));
        }
        Ok((0..n as usize)
            .map(|i| self.min + i as f64 * step)
            .filter(|&v| v < self.max)
            .collect())
    }
}

/// Rectangular region of (efficiency, fidelity) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub efficiency: Range,
    pub fidelity: Range,
}

impl Domain {
    pub fn new(efficiency: Range, fidelity: Range) -> Self {
        Self {
            efficiency,
            fidelity,
        }
    }

    /// `[0, 1] × [0.5, 1]`, the range every QuNet figure uses.
    pub fn reference() -> Self {
        Self {
            efficiency: Range { min: 0.0, max: 1.0 },
            fidelity: Range { min: 0.5, max: 1.0 },
        }
    }

    pub fn contains(&self, sample: &Sample) -> bool {
        sample.is_finite()
            && self.efficiency.contains(sample.efficiency)
            && self.fidelity.contains(sample.fidelity)
    }

    /// Re-check bounds on a domain that came from deserialization.
    pub fn validate(&self) -> Result<()> {
        Range::new(self.efficiency.min, self.efficiency.max)?;
        Range::new(self.fidelity.min, self.fidelity.max)?;
        Ok(())
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::reference()
    }
}

/// Efficiencies read from data, as opposed to a synthetic
/// [`SweepEfficiencies`](crate::curves::SweepEfficiencies).
#[derive(Debug, Clone, PartialEq)]
pub struct SampleEfficiencies(Vec<f64>);

impl SampleEfficiencies {
    pub fn from_samples(samples: &[Sample]) -> Self {
        Self(samples.iter().map(|s| s.efficiency).collect())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_domain_bounds() {
        let d = Domain::reference();
        assert_eq!(d.efficiency.min, 0.0);
        assert_eq!(d.efficiency.max, 1.0);
        assert_eq!(d.fidelity.min, 0.5);
        assert_eq!(d.fidelity.max, 1.0);
    }

    #[test]
    fn test_domain_is_closed() {
        let d = Domain::reference();
        assert!(d.contains(&Sample::new(0.0, 0.5)));
        assert!(d.contains(&Sample::new(1.0, 1.0)));
        assert!(!d.contains(&Sample::new(0.5, 0.49)));
        assert!(!d.contains(&Sample::new(1.01, 0.75)));
        assert!(!d.contains(&Sample::new(f64::NAN, 0.75)));
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(Range::new(1.0, 0.0).is_err());
        assert!(Range::new(0.5, 0.5).is_err());
        assert!(Range::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_arange_is_half_open() {
        let r = Range::new(0.0, 1.0).unwrap();
        let pts = r.arange(0.25).unwrap();
        assert_eq!(pts, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_arange_rejects_tiny_step() {
        let r = Range::new(0.0, 1.0).unwrap();
        let err = r.arange(1e-12).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert!(r.arange(1e-5).is_ok());
    }

    #[test]
    fn test_grid_cell_limit() {
        assert_eq!(check_grid_cells(4000, 4000).unwrap(), MAX_GRID_CELLS);
        assert!(check_grid_cells(4001, 4000).is_err());
        assert!(check_grid_cells(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_sample_efficiencies_keep_order() {
        let samples = [Sample::new(0.3, 0.9), Sample::new(0.1, 0.6)];
        let e = SampleEfficiencies::from_samples(&samples);
        assert_eq!(e.as_slice(), &[0.3, 0.1]);
    }
}
