//! Analytic repeater curves.
//!
//! Stage 1 is the single-hop model `f1(e) = e/2 + 1/2`. Each further stage
//! combines the previous stage with stage 1 the way an entanglement swap with
//! purification would: fidelities compose by normalized odds product and
//! efficiencies multiply, weighted by the probability that the combined
//! measurement succeeds.
//!
//! ```text
//! p   = f1·f(k-1) + (1 - f1)·(1 - f(k-1))
//! f_k = f1·f(k-1) / p
//! e_k = e1·e(k-1)·p
//! ```

use crate::error::{Error, Result};
use crate::sample::Range;

/// Synthetic uniform efficiency sweep, `start, start+step, ... < stop`.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepEfficiencies(Vec<f64>);

impl SweepEfficiencies {
    pub fn new(start: f64, stop: f64, step: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "sweep step must be positive, got {step}"
            )));
        }
        let range = Range::new(start, stop)?;
        Ok(Self(range.arange(step)?))
    }

    /// `0.00, 0.01, ..., 0.99`.
    pub fn reference() -> Self {
        Self((0..100).map(|i| i as f64 * 0.01).collect())
    }

    pub fn from_points(points: Vec<f64>) -> Self {
        Self(points)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub efficiency: f64,
    pub fidelity: f64,
}

/// One stage of the family, a point per sweep efficiency.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// 1-based stage number.
    pub stage: usize,
    pub points: Vec<CurvePoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurveFamily {
    pub curves: Vec<Curve>,
}

impl CurveFamily {
    pub fn depth(&self) -> usize {
        self.curves.len()
    }

    /// Curve for a 1-based stage.
    pub fn stage(&self, stage: usize) -> Option<&Curve> {
        stage.checked_sub(1).and_then(|i| self.curves.get(i))
    }
}

/// Single-hop fidelity model.
pub fn base_fidelity(e: f64) -> f64 {
    0.5 * e + 0.5
}

/// Combine a stage-`k-1` point with the base point into stage `k`.
fn compose(base: CurvePoint, prev: CurvePoint) -> CurvePoint {
    let f1 = base.fidelity;
    let fp = prev.fidelity;
    let p = f1 * fp + (1.0 - f1) * (1.0 - fp);
    CurvePoint {
        efficiency: base.efficiency * prev.efficiency * p,
        fidelity: f1 * fp / p,
    }
}

/// Derive stages `1..=depth` over the given sweep.
pub fn derive_curve_family(sweep: &SweepEfficiencies, depth: usize) -> Result<CurveFamily> {
    if depth == 0 {
        return Err(Error::InvalidParameter(
            "curve depth must be at least 1".to_string(),
        ));
    }

    let base: Vec<CurvePoint> = sweep
        .as_slice()
        .iter()
        .map(|&e| CurvePoint {
            efficiency: e,
            fidelity: base_fidelity(e),
        })
        .collect();

    let mut curves = Vec::with_capacity(depth);
    curves.push(Curve {
        stage: 1,
        points: base.clone(),
    });

    for stage in 2..=depth {
        let prev = &curves[stage - 2].points;
        let points = base
            .iter()
            .zip(prev.iter())
            .map(|(&b, &p)| compose(b, p))
            .collect();
        curves.push(Curve { stage, points });
    }

    Ok(CurveFamily { curves })
}
