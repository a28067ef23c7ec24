use std::path::{Path, PathBuf};

use log::info;
use qunet_core::{Domain, GridFigure, GridPanel, Result, bin_density, load_samples};

use crate::render::{self, figures::GridPlot};

pub fn run(
    inputs: &[PathBuf],
    output: &Path,
    columns: usize,
    titles: Option<&str>,
    bins: usize,
    colormap: &str,
) -> Result<()> {
    let titles = super::panel_titles(inputs, titles)?;
    let figure = GridFigure {
        panels: inputs
            .iter()
            .zip(titles)
            .map(|(input, title)| GridPanel {
                input: input.clone(),
                title: Some(title),
            })
            .collect(),
        output: output.to_path_buf(),
        columns,
        bins,
        colormap: colormap.parse()?,
    };
    render_figure(&figure, &Domain::reference())
}

/// Bin every panel's file and save them on one shared log scale.
pub fn render_figure(figure: &GridFigure, domain: &Domain) -> Result<()> {
    render::check_output(&figure.output)?;
    if figure.panels.is_empty() || figure.columns == 0 {
        return Err(qunet_core::Error::InvalidParameter(
            "grid needs at least one panel and one column".to_string(),
        ));
    }

    let mut panels = Vec::with_capacity(figure.panels.len());
    for panel in &figure.panels {
        let samples = load_samples(&panel.input)?;
        let grid = bin_density(&samples, domain, figure.bins)?;
        let title = panel
            .title
            .clone()
            .unwrap_or_else(|| super::file_stem(&panel.input));
        panels.push((title, grid));
    }

    let plot = GridPlot {
        panels,
        columns: figure.columns,
        colormap: figure.colormap,
    };
    info!(
        "grid: {} panels in {} rows",
        plot.panels.len(),
        plot.rows()
    );
    render::save(&plot, &figure.output)
}
