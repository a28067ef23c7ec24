//! Batch figure configuration.
//!
//! A batch is a JSON document listing figures to render. Each figure is
//! tagged by `kind`; every option except `input`/`output` falls back to the
//! values the QuNet paper figures use.
//!
//! ```json
//! {
//!   "figures": [
//!     { "kind": "heatmap", "input": "data/1pair1path.csv", "output": "multiheat.png",
//!       "log_scale": true, "key_rate": {} },
//!     { "kind": "kde", "input": "data/1pair1path.csv", "output": "gaussian_plot.png" }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::kde::Bandwidth;
use crate::sample::Domain;

/// End-to-end failure rate of a 100×100 grid lattice with 50 competing
/// user pairs.
pub const REFERENCE_P0: f64 = 0.201;
pub const REFERENCE_LEVELS: [f64; 8] = [0.01, 0.05, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
pub const REFERENCE_BINS: usize = 50;
pub const REFERENCE_RESOLUTION: f64 = 0.01;
pub const REFERENCE_DEPTH: usize = 4;
pub const REFERENCE_SWEEP_STEP: f64 = 0.01;
pub const REFERENCE_KDE_RESOLUTION: usize = 50;

fn default_bins() -> usize {
    REFERENCE_BINS
}
fn default_p0() -> f64 {
    REFERENCE_P0
}
fn default_levels() -> Vec<f64> {
    REFERENCE_LEVELS.to_vec()
}
fn default_resolution() -> f64 {
    REFERENCE_RESOLUTION
}
fn default_depth() -> usize {
    REFERENCE_DEPTH
}
fn default_sweep_step() -> f64 {
    REFERENCE_SWEEP_STEP
}
fn default_kde_resolution() -> usize {
    REFERENCE_KDE_RESOLUTION
}
fn default_columns() -> usize {
    3
}
fn default_grid_bins() -> usize {
    100
}
fn default_grid_colormap() -> Colormap {
    Colormap::Plasma
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Colormap {
    #[default]
    Hot,
    Plasma,
    Cool,
}

impl std::str::FromStr for Colormap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hot" => Ok(Colormap::Hot),
            "plasma" => Ok(Colormap::Plasma),
            "cool" => Ok(Colormap::Cool),
            other => Err(Error::InvalidParameter(format!(
                "unknown colormap '{other}' (expected hot, plasma or cool)"
            ))),
        }
    }
}

/// Key-rate iso-contours drawn over a heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyRateOverlay {
    #[serde(default = "default_p0")]
    pub p0: f64,
    #[serde(default = "default_resolution")]
    pub resolution: f64,
    #[serde(default = "default_levels")]
    pub levels: Vec<f64>,
}

impl Default for KeyRateOverlay {
    fn default() -> Self {
        Self {
            p0: REFERENCE_P0,
            resolution: REFERENCE_RESOLUTION,
            levels: default_levels(),
        }
    }
}

/// Analytic repeater curves drawn over a heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveOverlay {
    #[serde(default = "default_depth")]
    pub depth: usize,
    #[serde(default = "default_sweep_step")]
    pub sweep_step: f64,
}

impl Default for CurveOverlay {
    fn default() -> Self {
        Self {
            depth: REFERENCE_DEPTH,
            sweep_step: REFERENCE_SWEEP_STEP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapFigure {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default = "default_bins")]
    pub bins: usize,
    #[serde(default)]
    pub log_scale: bool,
    #[serde(default)]
    pub colormap: Colormap,
    #[serde(default)]
    pub colorbar: bool,
    #[serde(default)]
    pub key_rate: Option<KeyRateOverlay>,
    #[serde(default)]
    pub curves: Option<CurveOverlay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdeFigure {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default = "default_kde_resolution")]
    pub resolution: usize,
    #[serde(default)]
    pub bandwidth: Bandwidth,
    #[serde(default)]
    pub colormap: Colormap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagonalFigure {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default = "default_bins")]
    pub bins: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPanel {
    pub input: PathBuf,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridFigure {
    pub panels: Vec<GridPanel>,
    pub output: PathBuf,
    #[serde(default = "default_columns")]
    pub columns: usize,
    #[serde(default = "default_grid_bins")]
    pub bins: usize,
    #[serde(default = "default_grid_colormap")]
    pub colormap: Colormap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FigureConfig {
    Heatmap(HeatmapFigure),
    Kde(KdeFigure),
    Diagonal(DiagonalFigure),
    Grid(GridFigure),
}

impl FigureConfig {
    pub fn output(&self) -> &Path {
        match self {
            FigureConfig::Heatmap(f) => &f.output,
            FigureConfig::Kde(f) => &f.output,
            FigureConfig::Diagonal(f) => &f.output,
            FigureConfig::Grid(f) => &f.output,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FigureConfig::Heatmap(_) => "heatmap",
            FigureConfig::Kde(_) => "kde",
            FigureConfig::Diagonal(_) => "diagonal",
            FigureConfig::Grid(_) => "grid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub domain: Domain,
    pub figures: Vec<FigureConfig>,
}

impl BatchConfig {
    /// Load and validate a batch from a JSON file.
    ///
    /// Relative `input`/`output` paths are resolved against the directory
    /// holding the config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut config: BatchConfig =
            serde_json::from_str(&raw).map_err(|e| Error::Config {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.domain.validate()?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        for figure in &mut self.figures {
            match figure {
                FigureConfig::Heatmap(f) => {
                    fix(&mut f.input);
                    fix(&mut f.output);
                }
                FigureConfig::Kde(f) => {
                    fix(&mut f.input);
                    fix(&mut f.output);
                }
                FigureConfig::Diagonal(f) => {
                    fix(&mut f.input);
                    fix(&mut f.output);
                }
                FigureConfig::Grid(f) => {
                    for panel in &mut f.panels {
                        fix(&mut panel.input);
                    }
                    fix(&mut f.output);
                }
            }
        }
    }
}
