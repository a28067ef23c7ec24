//! Gaussian kernel density estimate of (efficiency, fidelity) samples.
//!
//! The kernel covariance is the sample covariance scaled by a bandwidth
//! factor squared. Both classic rules of thumb are available; in two
//! dimensions Scott's `n^(-1/6)` and Silverman's `(n·(d+2)/4)^(-1/(d+4))`
//! reduce to the same factor, so they differ only in name here. An explicit
//! factor can be given instead.

use std::f64::consts::PI;

use log::debug;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::{Error, Result};
use crate::sample::{Sample, SampleEfficiencies, check_grid_cells};

/// Determinant below this fraction of `var_e·var_f` counts as singular
/// (squared correlation within 1e-12 of one).
const SINGULAR_RATIO: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bandwidth {
    #[default]
    Scott,
    Silverman,
    Factor(f64),
}

impl Bandwidth {
    fn factor(self, n: usize) -> f64 {
        let n = n as f64;
        let d = 2.0;
        match self {
            Bandwidth::Scott => n.powf(-1.0 / (d + 4.0)),
            Bandwidth::Silverman => (n * (d + 2.0) / 4.0).powf(-1.0 / (d + 4.0)),
            Bandwidth::Factor(f) => f,
        }
    }
}

/// A fitted 2D Gaussian KDE.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    points: Vec<(f64, f64)>,
    /// Inverse kernel covariance `[[a, b], [b, c]]`.
    inv: (f64, f64, f64),
    norm: f64,
    pub factor: f64,
}

impl GaussianKde {
    /// Fit to `samples`. Fails on fewer than two samples, identical samples,
    /// or a singular covariance (all samples on a line).
    pub fn new(samples: &[Sample], bandwidth: Bandwidth) -> Result<Self> {
        let n = samples.len();
        if n < 2 {
            return Err(Error::InsufficientData(format!(
                "density estimation needs at least 2 samples, got {n}"
            )));
        }
        let first = samples[0];
        if samples.iter().all(|s| *s == first) {
            return Err(Error::InsufficientData(format!(
                "all {n} samples are identical"
            )));
        }

        let factor = bandwidth.factor(n);
        if !factor.is_finite() || factor <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "bandwidth factor must be positive, got {factor}"
            )));
        }

        let es = SampleEfficiencies::from_samples(samples);
        let fs: Vec<f64> = samples.iter().map(|s| s.fidelity).collect();
        let es = es.as_slice();

        let f2 = factor * factor;
        let var_e = es.variance() * f2;
        let var_f = fs.as_slice().variance() * f2;
        let cov_ef = es.covariance(fs.as_slice()) * f2;

        let det = var_e * var_f - cov_ef * cov_ef;
        if !det.is_finite() || det <= var_e * var_f * SINGULAR_RATIO {
            return Err(Error::InsufficientData(
                "sample covariance is singular; samples are collinear or constant on an axis"
                    .to_string(),
            ));
        }

        let inv = (var_f / det, -cov_ef / det, var_e / det);
        let norm = 1.0 / (n as f64 * 2.0 * PI * det.sqrt());
        debug!("kde fitted: n={n} factor={factor:.4} det={det:.3e}");

        Ok(Self {
            points: samples.iter().map(|s| (s.efficiency, s.fidelity)).collect(),
            inv,
            norm,
            factor,
        })
    }

    /// Density at a single point.
    pub fn evaluate(&self, efficiency: f64, fidelity: f64) -> f64 {
        let (a, b, c) = self.inv;
        let sum: f64 = self
            .points
            .iter()
            .map(|&(pe, pf)| {
                let de = efficiency - pe;
                let df = fidelity - pf;
                let q = a * de * de + 2.0 * b * de * df + c * df * df;
                (-0.5 * q).exp()
            })
            .sum();
        sum * self.norm
    }
}

/// KDE sampled on a regular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityField {
    pub efficiencies: Vec<f64>,
    pub fidelities: Vec<f64>,
    /// Row-major by fidelity: `values[fi * efficiencies.len() + ei]`.
    values: Vec<f64>,
}

impl DensityField {
    pub fn value(&self, efficiency_idx: usize, fidelity_idx: usize) -> f64 {
        self.values[fidelity_idx * self.efficiencies.len() + efficiency_idx]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Evaluate a Gaussian KDE of `samples` on a `resolution × resolution` grid
/// spanning the observed extents of each axis, endpoints included.
///
/// Non-finite samples are skipped before fitting.
pub fn kernel_density_estimate(
    samples: &[Sample],
    resolution: usize,
    bandwidth: Bandwidth,
) -> Result<DensityField> {
    if resolution < 2 {
        return Err(Error::InvalidParameter(format!(
            "grid resolution must be at least 2, got {resolution}"
        )));
    }
    check_grid_cells(resolution, resolution)?;

    let finite: Vec<Sample> = samples.iter().copied().filter(Sample::is_finite).collect();
    if finite.len() < samples.len() {
        debug!(
            "skipping {} non-finite samples",
            samples.len() - finite.len()
        );
    }
    let samples = finite.as_slice();
    let kde = GaussianKde::new(samples, bandwidth)?;

    let es: Vec<f64> = samples.iter().map(|s| s.efficiency).collect();
    let fs: Vec<f64> = samples.iter().map(|s| s.fidelity).collect();
    let efficiencies = linspace(Statistics::min(&es), Statistics::max(&es), resolution);
    let fidelities = linspace(Statistics::min(&fs), Statistics::max(&fs), resolution);

    let mut values = Vec::with_capacity(resolution * resolution);
    for &f in &fidelities {
        for &e in &efficiencies {
            values.push(kde.evaluate(e, f));
        }
    }

    Ok(DensityField {
        efficiencies,
        fidelities,
        values,
    })
}

fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    let step = (hi - lo) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { hi } else { lo + i as f64 * step })
        .collect()
}
