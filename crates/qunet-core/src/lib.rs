//! # qunet-core
//!
//! **Turn QuNet efficiency/fidelity samples into plottable fields.**
//!
//! `qunet-core` holds the numeric side of the QuNet paper figures: each
//! simulated end-to-end trial is an `(efficiency, fidelity)` [`Sample`], and
//! this crate bins them, derives analytic repeater curves, evaluates the
//! secret-key-rate surface and estimates smooth densities. Rendering lives in
//! `qunet-cli`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use qunet_core::{Domain, SweepEfficiencies, bin_density, derive_curve_family, load_samples};
//!
//! let samples = load_samples("1pair1path.csv")?;
//! let grid = bin_density(&samples, &Domain::reference(), 50)?;
//! println!("{} of {} samples in range", grid.total(), samples.len());
//!
//! let sweep = SweepEfficiencies::reference();
//! let family = derive_curve_family(&sweep, 4)?;
//! assert_eq!(family.depth(), 4);
//! # Ok::<(), qunet_core::Error>(())
//! ```
//!
//! ## Architecture
//!
//! CSV → [`Sample`]s → { [`DensityGrid`], [`DensityField`] }
//!
//! Sweep → [`CurveFamily`] and Domain → [`KeyRateSurface`] → [`IsoLine`]s
//!
//! Every operation is a pure function of its inputs. Figures are described
//! by a [`BatchConfig`] so several can be produced in one run.

pub mod config;
pub mod contour;
pub mod curves;
pub mod density;
pub mod error;
pub mod kde;
pub mod keyrate;
pub mod sample;
pub mod table;

pub use config::{
    BatchConfig, Colormap, CurveOverlay, DiagonalFigure, FigureConfig, GridFigure, GridPanel,
    HeatmapFigure, KdeFigure, KeyRateOverlay, REFERENCE_LEVELS, REFERENCE_P0,
};
pub use contour::{IsoLine, Segment, iso_lines};
pub use curves::{Curve, CurveFamily, CurvePoint, SweepEfficiencies, derive_curve_family};
pub use density::{DensityGrid, bin_density};
pub use error::{Error, Result};
pub use kde::{Bandwidth, DensityField, GaussianKde, kernel_density_estimate};
pub use keyrate::{KeyRateSurface, binary_entropy, key_rate, key_rate_contour};
pub use sample::{Domain, MAX_AXIS_POINTS, MAX_GRID_CELLS, Range, Sample, SampleEfficiencies};
pub use table::load_samples;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
