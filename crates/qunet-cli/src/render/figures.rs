//! The figure kinds: heatmap (with overlays), KDE mesh, diagonal line plot
//! and multi-panel heatmap grid.

use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use qunet_core::{Colormap, CurveFamily, DensityField, DensityGrid, IsoLine};

use super::colormap::{ColorScale, color_at};
use super::{DrawResult, Figure};

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const COLORBAR_WIDTH: i32 = 110;

/// Shared colour scale across one or more grids.
pub fn density_scale(grids: &[&DensityGrid], log: bool) -> ColorScale {
    let max = grids.iter().map(|g| g.max_count()).max().unwrap_or(0) as f64;
    if log {
        let min = grids
            .iter()
            .flat_map(|g| g.counts().iter().copied())
            .filter(|&c| c > 0)
            .min()
            .unwrap_or(1) as f64;
        ColorScale::log(min, max.max(min))
    } else {
        ColorScale::linear(max)
    }
}

fn format_tick(v: f64) -> String {
    if v.abs() >= 10.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

/// Split off a colour-bar strip on the right when requested.
fn with_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    colorbar: bool,
) -> (DrawingArea<DB, Shift>, Option<DrawingArea<DB, Shift>>) {
    if !colorbar {
        return (root.clone(), None);
    }
    let (w, _) = root.dim_in_pixel();
    let split = (w as i32 - COLORBAR_WIDTH).max(COLORBAR_WIDTH);
    let (main, bar) = root.split_horizontally(split);
    (main, Some(bar))
}

fn draw_colorbar<DB>(
    area: &DrawingArea<DB, Shift>,
    scale: ColorScale,
    map: Colormap,
    label: &str,
) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut chart = ChartBuilder::on(area)
        .margin_top(30)
        .margin_bottom(50)
        .margin_right(10)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0f64..1.0f64, 0.0f64..1.0f64)?;

    let formatter = |t: &f64| format_tick(scale.value_at(*t));
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(6)
        .y_label_formatter(&formatter)
        .y_desc(label)
        .draw()?;

    let steps = 100;
    chart.draw_series((0..steps).map(|i| {
        let t0 = i as f64 / steps as f64;
        let t1 = (i + 1) as f64 / steps as f64;
        Rectangle::new(
            [(0.0, t0), (1.0, t1)],
            color_at(map, (t0 + t1) / 2.0).filled(),
        )
    }))?;
    Ok(())
}

/// Axes plus filled cells for one density grid.
fn density_chart<'a, DB>(
    area: &'a DrawingArea<DB, Shift>,
    grid: &DensityGrid,
    scale: ColorScale,
    map: Colormap,
    title: Option<&str>,
) -> Result<Chart<'a, DB>, Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let d = grid.domain;
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50);
    if let Some(title) = title {
        builder.caption(title, ("sans-serif", 18));
    }
    let mut chart = builder.build_cartesian_2d(
        d.efficiency.min..d.efficiency.max,
        d.fidelity.min..d.fidelity.max,
    )?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Efficiency")
        .y_desc("Fidelity")
        .draw()?;

    let e_edges = grid.efficiency_edges();
    let f_edges = grid.fidelity_edges();
    // Log colour scales leave empty cells blank; linear ones paint them.
    let cells: Vec<(usize, usize, u64)> = if scale.log {
        grid.occupied().collect()
    } else {
        (0..grid.bins)
            .flat_map(|ei| (0..grid.bins).map(move |fi| (ei, fi)))
            .map(|(ei, fi)| (ei, fi, grid.count(ei, fi)))
            .collect()
    };
    chart.draw_series(cells.into_iter().map(|(ei, fi, c)| {
        Rectangle::new(
            [(e_edges[ei], f_edges[fi]), (e_edges[ei + 1], f_edges[fi + 1])],
            color_at(map, scale.normalize(c as f64)).filled(),
        )
    }))?;
    Ok(chart)
}

fn draw_iso_lines<DB>(chart: &mut Chart<'_, DB>, lines: &[IsoLine]) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = lines.len();
    for (i, line) in lines.iter().enumerate() {
        let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
        let color = color_at(Colormap::Cool, t);
        chart.draw_series(
            line.segments
                .iter()
                .map(|s| PathElement::new(vec![s.start, s.end], color.stroke_width(1))),
        )?;
        if let Some(anchor) = line.label_anchor() {
            chart.draw_series(std::iter::once(Text::new(
                format!("{:.2}", line.level),
                anchor,
                ("sans-serif", 12).into_font().color(&color),
            )))?;
        }
    }
    Ok(())
}

fn draw_curves<DB>(chart: &mut Chart<'_, DB>, family: &CurveFamily) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    for curve in &family.curves {
        chart.draw_series(LineSeries::new(
            curve.points.iter().map(|p| (p.efficiency, p.fidelity)),
            RED.stroke_width(1),
        ))?;
    }
    Ok(())
}

/// Binned density with optional key-rate contours and repeater curves.
#[derive(Debug, Clone)]
pub struct HeatmapPlot {
    pub grid: DensityGrid,
    pub log_scale: bool,
    pub colormap: Colormap,
    pub colorbar: bool,
    pub iso_lines: Vec<IsoLine>,
    pub curves: Option<CurveFamily>,
    pub title: Option<String>,
}

impl Figure for HeatmapPlot {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let scale = density_scale(&[&self.grid], self.log_scale);
        let (main, bar) = with_colorbar(root, self.colorbar);

        let mut chart = density_chart(
            &main,
            &self.grid,
            scale,
            self.colormap,
            self.title.as_deref(),
        )?;
        draw_iso_lines(&mut chart, &self.iso_lines)?;
        if let Some(family) = &self.curves {
            draw_curves(&mut chart, family)?;
        }

        if let Some(bar) = bar {
            draw_colorbar(&bar, scale, self.colormap, "Count")?;
        }
        Ok(())
    }
}

/// Smoothed density mesh from a Gaussian KDE.
#[derive(Debug, Clone)]
pub struct KdePlot {
    pub field: DensityField,
    pub colormap: Colormap,
}

/// Cell boundaries around grid centres, half a step either side.
fn centre_edges(centres: &[f64]) -> Vec<f64> {
    let n = centres.len();
    if n < 2 {
        return centres.to_vec();
    }
    let mut edges = Vec::with_capacity(n + 1);
    edges.push(centres[0] - (centres[1] - centres[0]) / 2.0);
    for w in centres.windows(2) {
        edges.push((w[0] + w[1]) / 2.0);
    }
    edges.push(centres[n - 1] + (centres[n - 1] - centres[n - 2]) / 2.0);
    edges
}

impl Figure for KdePlot {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let e_edges = centre_edges(&self.field.efficiencies);
        let f_edges = centre_edges(&self.field.fidelities);
        let (Some(&e0), Some(&e1)) = (e_edges.first(), e_edges.last()) else {
            return Ok(());
        };
        let (Some(&f0), Some(&f1)) = (f_edges.first(), f_edges.last()) else {
            return Ok(());
        };

        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(e0..e1, f0..f1)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Efficiency")
            .y_desc("Fidelity")
            .draw()?;

        let scale = ColorScale::linear(self.field.max_value());
        let nx = self.field.efficiencies.len();
        let ny = self.field.fidelities.len();
        chart.draw_series((0..ny).flat_map(|fi| (0..nx).map(move |ei| (ei, fi))).map(
            |(ei, fi)| {
                Rectangle::new(
                    [(e_edges[ei], f_edges[fi]), (e_edges[ei + 1], f_edges[fi + 1])],
                    color_at(self.colormap, scale.normalize(self.field.value(ei, fi))).filled(),
                )
            },
        ))?;
        Ok(())
    }
}

/// Counts along the density grid's diagonal, plotted against the
/// efficiency bin centres.
#[derive(Debug, Clone)]
pub struct DiagonalPlot {
    pub centers: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Figure for DiagonalPlot {
    fn size(&self) -> (u32, u32) {
        (1000, 600)
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let x0 = self.centers.first().copied().unwrap_or(0.0);
        let x1 = self.centers.last().copied().unwrap_or(1.0).max(x0 + f64::EPSILON);
        let y_max = self.counts.iter().copied().max().unwrap_or(0).max(1) as f64;

        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, 0.0..(y_max * 1.1))?;
        chart
            .configure_mesh()
            .x_desc("Efficiency")
            .y_desc("Count")
            .draw()?;

        chart.draw_series(LineSeries::new(
            self.centers
                .iter()
                .zip(&self.counts)
                .map(|(&x, &c)| (x, c as f64)),
            &BLUE,
        ))?;
        Ok(())
    }
}

/// Log-scaled heatmaps side by side, sharing one colour scale.
#[derive(Debug, Clone)]
pub struct GridPlot {
    pub panels: Vec<(String, DensityGrid)>,
    pub columns: usize,
    pub colormap: Colormap,
}

impl GridPlot {
    pub fn rows(&self) -> usize {
        self.panels.len().div_ceil(self.columns.max(1))
    }
}

impl Figure for GridPlot {
    fn size(&self) -> (u32, u32) {
        let cols = self.columns.max(1).min(self.panels.len().max(1)) as u32;
        let rows = self.rows().max(1) as u32;
        (cols * 500 + COLORBAR_WIDTH as u32, rows * 500)
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let grids: Vec<&DensityGrid> = self.panels.iter().map(|(_, g)| g).collect();
        let scale = density_scale(&grids, true);
        let (main, bar) = with_colorbar(root, true);

        let cols = self.columns.max(1).min(self.panels.len().max(1));
        let areas = main.split_evenly((self.rows().max(1), cols));
        for (area, (title, grid)) in areas.iter().zip(&self.panels) {
            density_chart(area, grid, scale, self.colormap, Some(title.as_str()))?;
        }

        if let Some(bar) = bar {
            draw_colorbar(&bar, scale, self.colormap, "Count")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qunet_core::{Domain, Sample, bin_density};

    #[test]
    fn test_density_scale_log_uses_smallest_positive_count() {
        let a = bin_density(&vec![Sample::new(0.1, 0.6); 3], &Domain::reference(), 4).unwrap();
        let b = bin_density(&vec![Sample::new(0.9, 0.9); 40], &Domain::reference(), 4).unwrap();
        let s = density_scale(&[&a, &b], true);
        assert!(s.log);
        assert_eq!(s.min, 3.0);
        assert_eq!(s.max, 40.0);
        let lin = density_scale(&[&a], false);
        assert_eq!(lin.min, 0.0);
        assert_eq!(lin.max, 3.0);
    }

    #[test]
    fn test_density_scale_empty_grid() {
        let g = bin_density(&[], &Domain::reference(), 4).unwrap();
        let s = density_scale(&[&g], true);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 1.0);
    }

    #[test]
    fn test_centre_edges() {
        let e = centre_edges(&[0.0, 1.0, 2.0]);
        assert_eq!(e, vec![-0.5, 0.5, 1.5, 2.5]);
    }

    #[test]
    fn test_grid_layout() {
        let g = bin_density(&[], &Domain::reference(), 2).unwrap();
        let plot = GridPlot {
            panels: (0..7).map(|i| (format!("p{i}"), g.clone())).collect(),
            columns: 3,
            colormap: Colormap::Plasma,
        };
        assert_eq!(plot.rows(), 3);
        assert_eq!(plot.size(), (1500 + 110, 1500));
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(1234.4), "1234");
        assert_eq!(format_tick(2.5), "2.50");
    }
}
