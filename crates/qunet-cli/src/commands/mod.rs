pub mod batch;
pub mod curves;
pub mod diagonal;
pub mod grid;
pub mod heatmap;
pub mod kde;

use std::path::Path;

use qunet_core::{Bandwidth, Error, Result};

/// Parse a comma-separated list of contour levels.
pub fn parse_levels(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| Error::InvalidParameter(format!("invalid contour level '{s}'")))
        })
        .collect()
}

/// Bandwidth by rule name, or a plain number taken as the factor.
pub fn parse_bandwidth(raw: &str) -> Result<Bandwidth> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "scott" => Ok(Bandwidth::Scott),
        "silverman" => Ok(Bandwidth::Silverman),
        other => other.parse::<f64>().map(Bandwidth::Factor).map_err(|_| {
            Error::InvalidParameter(format!(
                "unknown bandwidth '{other}' (expected scott, silverman or a number)"
            ))
        }),
    }
}

/// Panel titles: the comma-separated list when given, file stems otherwise.
pub fn panel_titles(inputs: &[impl AsRef<Path>], titles: Option<&str>) -> Result<Vec<String>> {
    match titles {
        Some(raw) => {
            let titles: Vec<String> = raw.split(',').map(|s| s.trim().to_string()).collect();
            if titles.len() != inputs.len() {
                return Err(Error::InvalidParameter(format!(
                    "{} titles given for {} panels",
                    titles.len(),
                    inputs.len()
                )));
            }
            Ok(titles)
        }
        None => Ok(inputs.iter().map(|p| file_stem(p.as_ref())).collect()),
    }
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!(parse_levels("0.01, 0.1,0.5").unwrap(), vec![0.01, 0.1, 0.5]);
        assert_eq!(parse_levels("0.2,").unwrap(), vec![0.2]);
        assert!(parse_levels("0.1,abc").is_err());
        assert!(parse_levels("nan").is_err());
    }

    #[test]
    fn test_parse_bandwidth() {
        assert_eq!(parse_bandwidth("Scott").unwrap(), Bandwidth::Scott);
        assert_eq!(parse_bandwidth("silverman").unwrap(), Bandwidth::Silverman);
        assert_eq!(parse_bandwidth("0.3").unwrap(), Bandwidth::Factor(0.3));
        assert!(matches!(
            parse_bandwidth("wide").unwrap_err(),
            Error::InvalidParameter(_)
        ));
    }

    #[test]
    fn test_panel_titles_default_to_stems() {
        let inputs = ["data/1pair1path.csv", "data/500pair2path.csv"];
        assert_eq!(
            panel_titles(&inputs, None).unwrap(),
            vec!["1pair1path", "500pair2path"]
        );
        assert_eq!(
            panel_titles(&inputs, Some("a, b")).unwrap(),
            vec!["a", "b"]
        );
        assert!(panel_titles(&inputs, Some("only one")).is_err());
    }
}
