//! Figure rendering on top of plotters.
//!
//! Every figure implements [`Figure`] once, generically over the drawing
//! backend; [`save`] picks the bitmap or SVG backend from the output path's
//! extension.

pub mod colormap;
pub mod figures;

use std::error::Error as StdError;
use std::path::Path;

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use qunet_core::{Error, Result};

pub type DrawResult = std::result::Result<(), Box<dyn StdError>>;

/// Something that can be drawn onto a root drawing area.
pub trait Figure {
    fn size(&self) -> (u32, u32) {
        (1000, 800)
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Bitmap,
    Svg,
}

/// Output format from the file extension (case-insensitive).
pub fn output_format(path: &Path) -> Result<OutputFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" | "bmp" | "jpg" | "jpeg" => Ok(OutputFormat::Bitmap),
        "svg" => Ok(OutputFormat::Svg),
        other => Err(Error::InvalidParameter(format!(
            "{}: unsupported image format '{other}' (use .png, .bmp, .jpg or .svg)",
            path.display()
        ))),
    }
}

/// Render `figure` to `path`, creating parent directories as needed.
pub fn save<F: Figure>(figure: &F, path: &Path) -> Result<()> {
    let format = output_format(path)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    let size = figure.size();
    let result = match format {
        OutputFormat::Bitmap => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_and_present(figure, &root)
        }
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_and_present(figure, &root)
        }
    };
    result.map_err(|e| Error::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    info!("wrote {}", path.display());
    Ok(())
}

fn draw_and_present<F, DB>(figure: &F, root: &DrawingArea<DB, Shift>) -> DrawResult
where
    F: Figure,
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    figure.draw(root)?;
    root.present()?;
    Ok(())
}

/// Ensure the output path is writable as an image before doing any work.
pub fn check_output(path: &Path) -> Result<()> {
    output_format(path).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_by_extension() {
        assert_eq!(output_format(Path::new("a.png")).unwrap(), OutputFormat::Bitmap);
        assert_eq!(output_format(Path::new("A.PNG")).unwrap(), OutputFormat::Bitmap);
        assert_eq!(output_format(Path::new("out/b.svg")).unwrap(), OutputFormat::Svg);
    }

    #[test]
    fn test_pdf_rejected() {
        let err = output_format(Path::new("multiheat.pdf")).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert!(output_format(Path::new("noext")).is_err());
    }
}
