//! 2D binned density of samples over a fixed domain.
//!
//! Each axis of the [`Domain`] is split into `bins` equal-width intervals.
//! Bins are half-open except the last, which also takes samples sitting
//! exactly on the upper bound, so every in-domain sample lands somewhere.

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::sample::{Domain, Range, Sample, check_grid_cells};

/// Sample counts on a `bins × bins` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    pub domain: Domain,
    pub bins: usize,
    /// Row-major by efficiency bin: `counts[ei * bins + fi]`.
    counts: Vec<u64>,
    /// Samples that fell outside the domain.
    pub dropped: usize,
}

/// Count samples into `bin_count × bin_count` equal cells of `domain`.
///
/// Out-of-domain and non-finite samples are dropped. An empty sample slice
/// yields an all-zero grid.
pub fn bin_density(samples: &[Sample], domain: &Domain, bin_count: usize) -> Result<DensityGrid> {
    if bin_count == 0 {
        return Err(Error::InvalidParameter(
            "bin count must be at least 1".to_string(),
        ));
    }

    let cells = check_grid_cells(bin_count, bin_count)?;
    let mut counts = vec![0u64; cells];
    let mut dropped = 0usize;

    for s in samples {
        if !domain.contains(s) {
            dropped += 1;
            continue;
        }
        let ei = bin_index(&domain.efficiency, s.efficiency, bin_count);
        let fi = bin_index(&domain.fidelity, s.fidelity, bin_count);
        counts[ei * bin_count + fi] += 1;
    }

    if dropped > 0 {
        warn!(
            "{dropped} of {} samples outside domain {:?}, dropped",
            samples.len(),
            domain
        );
    }
    debug!(
        "binned {} samples into {bin_count}x{bin_count} grid",
        samples.len() - dropped
    );

    Ok(DensityGrid {
        domain: *domain,
        bins: bin_count,
        counts,
        dropped,
    })
}

/// Cell of `v`, checked against the same edges [`edges`] reports so a
/// sample on an interior edge always opens the upper cell.
fn bin_index(range: &Range, v: f64, bins: usize) -> usize {
    let width = range.span() / bins as f64;
    let edge = |i: usize| range.min + i as f64 * width;
    let mut idx = (((v - range.min) / width).floor().max(0.0) as usize).min(bins - 1);
    if idx + 1 < bins && v >= edge(idx + 1) {
        idx += 1;
    } else if idx > 0 && v < edge(idx) {
        idx -= 1;
    }
    idx
}

fn edges(range: &Range, bins: usize) -> Vec<f64> {
    let width = range.span() / bins as f64;
    (0..=bins).map(|i| range.min + i as f64 * width).collect()
}

fn centers(range: &Range, bins: usize) -> Vec<f64> {
    let width = range.span() / bins as f64;
    (0..bins).map(|i| range.min + (i as f64 + 0.5) * width).collect()
}

impl DensityGrid {
    pub fn count(&self, efficiency_bin: usize, fidelity_bin: usize) -> u64 {
        self.counts[efficiency_bin * self.bins + fidelity_bin]
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total number of binned samples.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn efficiency_edges(&self) -> Vec<f64> {
        edges(&self.domain.efficiency, self.bins)
    }

    pub fn fidelity_edges(&self) -> Vec<f64> {
        edges(&self.domain.fidelity, self.bins)
    }

    pub fn efficiency_centers(&self) -> Vec<f64> {
        centers(&self.domain.efficiency, self.bins)
    }

    pub fn fidelity_centers(&self) -> Vec<f64> {
        centers(&self.domain.fidelity, self.bins)
    }

    /// Natural log of each count; `None` where the cell is empty.
    pub fn log_scaled(&self) -> Vec<Option<f64>> {
        self.counts
            .iter()
            .map(|&c| if c > 0 { Some((c as f64).ln()) } else { None })
            .collect()
    }

    /// Counts along the main diagonal, cell `(i, i)` for each `i`.
    ///
    /// With the reference domain this tracks samples whose fidelity rises
    /// in step with efficiency, which for single-path routing traces a
    /// bell-shaped profile.
    pub fn diagonal(&self) -> Vec<u64> {
        (0..self.bins).map(|i| self.count(i, i)).collect()
    }

    /// Iterate `(efficiency_bin, fidelity_bin, count)` over non-empty cells.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(i, &c)| (i / self.bins, i % self.bins, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lcg_samples(n: usize, seed: u64) -> Vec<Sample> {
        let mut state = seed;
        let mut next = || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        };
        // Spread a little past the reference domain so some samples drop.
        (0..n)
            .map(|_| Sample::new(next() * 1.2 - 0.1, next() * 0.7 + 0.4))
            .collect()
    }

    #[test]
    fn test_counts_are_conserved() {
        let samples = lcg_samples(5000, 0xdeadbeef);
        let domain = Domain::reference();
        let in_domain = samples.iter().filter(|s| domain.contains(s)).count() as u64;
        for bins in [1, 2, 7, 50, 400] {
            let grid = bin_density(&samples, &domain, bins).unwrap();
            assert_eq!(grid.total(), in_domain, "bins={bins}");
            assert_eq!(grid.total() + grid.dropped as u64, samples.len() as u64);
        }
    }

    #[test]
    fn test_empty_input_gives_zero_grid() {
        let grid = bin_density(&[], &Domain::reference(), 10).unwrap();
        assert_eq!(grid.total(), 0);
        assert_eq!(grid.counts().len(), 100);
        assert_eq!(grid.max_count(), 0);
    }

    #[test]
    fn test_zero_bins_rejected() {
        assert!(bin_density(&[], &Domain::reference(), 0).is_err());
    }

    #[test]
    fn test_upper_edge_goes_to_last_bin() {
        let samples = [Sample::new(1.0, 1.0), Sample::new(0.0, 0.5)];
        let grid = bin_density(&samples, &Domain::reference(), 4).unwrap();
        assert_eq!(grid.count(3, 3), 1);
        assert_eq!(grid.count(0, 0), 1);
    }

    #[test]
    fn test_cell_assignment() {
        // Efficiency 0.3 → bin 1 of 4; fidelity 0.9 → (0.4/0.5)*4 = 3.2 → bin 3.
        let grid = bin_density(&[Sample::new(0.3, 0.9)], &Domain::reference(), 4).unwrap();
        assert_eq!(grid.count(1, 3), 1);
        assert_eq!(grid.occupied().collect::<Vec<_>>(), vec![(1, 3, 1)]);
    }

    #[test]
    fn test_log_scaled_omits_empty_cells() {
        let samples = vec![Sample::new(0.1, 0.6); 10];
        let grid = bin_density(&samples, &Domain::reference(), 2).unwrap();
        let logs = grid.log_scaled();
        assert_eq!(logs.iter().filter(|v| v.is_none()).count(), 3);
        let v = logs.iter().flatten().next().copied().unwrap();
        assert!((v - 10f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_diagonal() {
        let samples = [
            Sample::new(0.1, 0.55),
            Sample::new(0.9, 0.95),
            Sample::new(0.9, 0.96),
            Sample::new(0.1, 0.95),
        ];
        let grid = bin_density(&samples, &Domain::reference(), 2).unwrap();
        assert_eq!(grid.diagonal(), vec![1, 2]);
    }

    #[test]
    fn test_edges() {
        let grid = bin_density(&[], &Domain::reference(), 5).unwrap();
        let e = grid.efficiency_edges();
        let f = grid.fidelity_edges();
        assert_eq!(e.len(), 6);
        assert!((e[1] - 0.2).abs() < 1e-12);
        assert!((f[5] - 1.0).abs() < 1e-12);

        let c = grid.fidelity_centers();
        assert_eq!(c.len(), 5);
        assert!((c[0] - 0.55).abs() < 1e-12);
        assert!((grid.efficiency_centers()[4] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_interior_edges_open_upper_cell() {
        let domain = Domain::reference();
        for bins in [10, 50, 100] {
            let e_edges = bin_density(&[], &domain, bins).unwrap().efficiency_edges();
            let f_edges = bin_density(&[], &domain, bins).unwrap().fidelity_edges();
            for i in 1..bins {
                let grid =
                    bin_density(&[Sample::new(e_edges[i], f_edges[i])], &domain, bins).unwrap();
                assert_eq!(grid.count(i, i), 1, "bins={bins}, edge {i}");
            }
        }
        let grid = bin_density(&[Sample::new(0.5, 0.6)], &domain, 10).unwrap();
        assert_eq!(grid.count(5, 2), 1);
    }

    #[test]
    fn test_oversized_bin_count_rejected() {
        let domain = Domain::reference();
        let err = bin_density(&[], &domain, 5000).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert!(bin_density(&[], &domain, usize::MAX).is_err());
    }
}
