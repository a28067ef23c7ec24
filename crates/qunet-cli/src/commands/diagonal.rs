use std::path::Path;

use log::info;
use qunet_core::{DiagonalFigure, Domain, Result, bin_density, load_samples};

use crate::render::{self, figures::DiagonalPlot};

pub fn run(input: &Path, output: &Path, bins: usize) -> Result<()> {
    let figure = DiagonalFigure {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        bins,
    };
    render_figure(&figure, &Domain::reference())
}

pub fn render_figure(figure: &DiagonalFigure, domain: &Domain) -> Result<()> {
    render::check_output(&figure.output)?;

    let samples = load_samples(&figure.input)?;
    let grid = bin_density(&samples, domain, figure.bins)?;
    let counts = grid.diagonal();
    info!(
        "diagonal {}: {} of {} samples on the diagonal",
        figure.input.display(),
        counts.iter().sum::<u64>(),
        grid.total()
    );

    let plot = DiagonalPlot {
        centers: grid.efficiency_centers(),
        counts,
    };
    render::save(&plot, &figure.output)
}
