use std::path::Path;

use log::{debug, info};
use qunet_core::config::REFERENCE_LEVELS;
use qunet_core::{
    CurveOverlay, Domain, HeatmapFigure, KeyRateOverlay, Result, SweepEfficiencies, bin_density,
    derive_curve_family, iso_lines, key_rate_contour, load_samples,
};

use crate::render::{self, figures::HeatmapPlot};

pub struct HeatmapCommandConfig<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub bins: usize,
    pub log_scale: bool,
    pub colormap: &'a str,
    pub colorbar: bool,
    pub contours: bool,
    pub p0: f64,
    pub levels: Option<&'a str>,
    pub resolution: f64,
    pub curves: bool,
    pub depth: usize,
    pub sweep_step: f64,
}

pub fn run(cfg: HeatmapCommandConfig<'_>) -> Result<()> {
    let levels = match cfg.levels {
        Some(raw) => super::parse_levels(raw)?,
        None => REFERENCE_LEVELS.to_vec(),
    };
    let figure = HeatmapFigure {
        input: cfg.input.to_path_buf(),
        output: cfg.output.to_path_buf(),
        bins: cfg.bins,
        log_scale: cfg.log_scale,
        colormap: cfg.colormap.parse()?,
        colorbar: cfg.colorbar,
        key_rate: cfg.contours.then(|| KeyRateOverlay {
            p0: cfg.p0,
            resolution: cfg.resolution,
            levels,
        }),
        curves: cfg.curves.then(|| CurveOverlay {
            depth: cfg.depth,
            sweep_step: cfg.sweep_step,
        }),
    };
    render_figure(&figure, &Domain::reference())
}

/// Build and save one heatmap figure.
pub fn render_figure(figure: &HeatmapFigure, domain: &Domain) -> Result<()> {
    render::check_output(&figure.output)?;

    let samples = load_samples(&figure.input)?;
    let grid = bin_density(&samples, domain, figure.bins)?;

    let lines = match &figure.key_rate {
        Some(overlay) => {
            let surface = key_rate_contour(domain, overlay.resolution, overlay.p0)?;
            let lines = iso_lines(&surface, &overlay.levels);
            let drawn = lines.iter().filter(|l| !l.is_empty()).count();
            debug!("{drawn} of {} contour levels cross the domain", lines.len());
            lines
        }
        None => Vec::new(),
    };

    let curves = match &figure.curves {
        Some(overlay) => {
            let sweep = SweepEfficiencies::new(0.0, 1.0, overlay.sweep_step)?;
            Some(derive_curve_family(&sweep, overlay.depth)?)
        }
        None => None,
    };

    info!(
        "heatmap {}: {} samples in {}x{} bins",
        figure.input.display(),
        grid.total(),
        grid.bins,
        grid.bins
    );

    let plot = HeatmapPlot {
        grid,
        log_scale: figure.log_scale,
        colormap: figure.colormap,
        colorbar: figure.colorbar,
        iso_lines: lines,
        curves,
        title: None,
    };
    render::save(&plot, &figure.output)
}
