use std::path::Path;

use log::{error, info};
use qunet_core::{BatchConfig, Domain, Error, FigureConfig, Result};

pub fn run(config_path: &Path) -> Result<()> {
    let config = BatchConfig::from_path(config_path)?;
    info!(
        "batch {}: {} figures",
        config_path.display(),
        config.figures.len()
    );

    let failed = run_all(&config);
    if failed > 0 {
        return Err(Error::BatchFailed {
            failed,
            total: config.figures.len(),
        });
    }
    Ok(())
}

/// Render every figure, logging failures. Returns the failure count.
fn run_all(config: &BatchConfig) -> usize {
    let mut failed = 0;
    for figure in &config.figures {
        if let Err(e) = render_one(figure, &config.domain) {
            error!(
                "{} figure {} failed: {e}",
                figure.kind(),
                figure.output().display()
            );
            failed += 1;
        }
    }
    failed
}

fn render_one(figure: &FigureConfig, domain: &Domain) -> Result<()> {
    match figure {
        FigureConfig::Heatmap(f) => super::heatmap::render_figure(f, domain),
        FigureConfig::Kde(f) => super::kde::render_figure(f),
        FigureConfig::Diagonal(f) => super::diagonal::render_figure(f, domain),
        FigureConfig::Grid(f) => super::grid::render_figure(f, domain),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg_path = tmp.path().join("figures.json");
        std::fs::write(
            &cfg_path,
            r#"{"figures": [
                {"kind": "heatmap", "input": "missing.csv", "output": "a.png"},
                {"kind": "kde", "input": "missing.csv", "output": "b.pdf"},
                {"kind": "diagonal", "input": "also-missing.csv", "output": "c.svg", "bins": 0}
            ]}"#,
        )
        .unwrap();

        let config = BatchConfig::from_path(&cfg_path).unwrap();
        assert_eq!(run_all(&config), 3);
        let err = run(&cfg_path).unwrap_err();
        assert!(matches!(err, Error::BatchFailed { failed: 3, total: 3 }));
        assert_eq!(err.to_string(), "3 of 3 figures failed");
    }

    #[test]
    fn test_empty_batch_succeeds() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg_path = tmp.path().join("empty.json");
        std::fs::write(&cfg_path, r#"{"figures": []}"#).unwrap();
        assert!(run(&cfg_path).is_ok());
    }
}
