//! Secret-key rate bound over the (efficiency, fidelity) plane.
//!
//! With an end-to-end failure probability `p0`, the per-pair rate is
//! `R = (1 - p0)·E` and the asymptotic key fraction is one minus the binary
//! entropy of the fidelity:
//!
//! ```text
//! C(E, F) = R · (1 + F·log2 F + (1 - F)·log2(1 - F))
//! ```

use log::debug;

use crate::error::{Error, Result};
use crate::sample::{Domain, check_grid_cells};

/// `x·log2(x)` with the limit value `0` at `x = 0`.
fn xlog2x(x: f64) -> f64 {
    if x == 0.0 { 0.0 } else { x * x.log2() }
}

/// Binary entropy `H(F) = -F·log2 F - (1-F)·log2(1-F)`, for `F` in [0, 1].
pub fn binary_entropy(f: f64) -> f64 {
    -(xlog2x(f) + xlog2x(1.0 - f))
}

/// Key-rate bound at a single point.
pub fn key_rate(efficiency: f64, fidelity: f64, p0: f64) -> f64 {
    let r = (1.0 - p0) * efficiency;
    r * (1.0 - binary_entropy(fidelity))
}

/// `C(E, F)` sampled on a regular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyRateSurface {
    pub p0: f64,
    /// Column coordinates.
    pub efficiencies: Vec<f64>,
    /// Row coordinates.
    pub fidelities: Vec<f64>,
    /// Row-major by fidelity: `values[fi * efficiencies.len() + ei]`.
    values: Vec<f64>,
}

impl KeyRateSurface {
    pub fn value(&self, efficiency_idx: usize, fidelity_idx: usize) -> f64 {
        self.values[fidelity_idx * self.efficiencies.len() + efficiency_idx]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn nx(&self) -> usize {
        self.efficiencies.len()
    }

    pub fn ny(&self) -> usize {
        self.fidelities.len()
    }

    /// Largest value on the grid, `0.0` for an empty grid.
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Evaluate the key-rate bound on `domain` with the given grid step.
///
/// Axes are half-open (`min, min+step, ... < max`). The fidelity range must
/// lie within [0, 1]; `p0` must lie in [0, 1).
pub fn key_rate_contour(domain: &Domain, resolution: f64, p0: f64) -> Result<KeyRateSurface> {
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "grid resolution must be positive, got {resolution}"
        )));
    }
    if !(0.0..1.0).contains(&p0) {
        return Err(Error::InvalidParameter(format!(
            "failure probability must be in [0, 1), got {p0}"
        )));
    }
    domain.validate()?;
    if domain.fidelity.min < 0.0 || domain.fidelity.max > 1.0 {
        return Err(Error::InvalidParameter(format!(
            "fidelity range [{}, {}] must lie within [0, 1]",
            domain.fidelity.min, domain.fidelity.max
        )));
    }

    let efficiencies = domain.efficiency.arange(resolution)?;
    let fidelities = domain.fidelity.arange(resolution)?;
    let cells = check_grid_cells(efficiencies.len(), fidelities.len())?;

    let mut values = Vec::with_capacity(cells);
    for &f in &fidelities {
        for &e in &efficiencies {
            values.push(key_rate(e, f, p0));
        }
    }

    debug!(
        "key-rate surface {}x{} at p0={p0}",
        efficiencies.len(),
        fidelities.len()
    );

    Ok(KeyRateSurface {
        p0,
        efficiencies,
        fidelities,
        values,
    })
}
