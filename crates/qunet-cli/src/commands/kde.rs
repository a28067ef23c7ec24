use std::path::Path;

use log::info;
use qunet_core::{KdeFigure, Result, kernel_density_estimate, load_samples};

use crate::render::{self, figures::KdePlot};

pub fn run(
    input: &Path,
    output: &Path,
    resolution: usize,
    bandwidth: &str,
    colormap: &str,
) -> Result<()> {
    let figure = KdeFigure {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        resolution,
        bandwidth: super::parse_bandwidth(bandwidth)?,
        colormap: colormap.parse()?,
    };
    render_figure(&figure)
}

/// Fit the KDE and save the mesh. The grid spans the observed extents, so
/// no domain applies.
pub fn render_figure(figure: &KdeFigure) -> Result<()> {
    render::check_output(&figure.output)?;

    let samples = load_samples(&figure.input)?;
    let field = kernel_density_estimate(&samples, figure.resolution, figure.bandwidth)?;
    info!(
        "kde {}: {} samples on a {}x{} grid",
        figure.input.display(),
        samples.len(),
        figure.resolution,
        figure.resolution
    );

    let plot = KdePlot {
        field,
        colormap: figure.colormap,
    };
    render::save(&plot, &figure.output)
}
