//! CSV ingest for QuNet heatmap data.
//!
//! Input files carry one row per simulated trial with at least the columns
//! `Efficiency` and `Fidelity`, located by header name. Any other columns
//! are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::sample::Sample;

pub const EFFICIENCY_COLUMN: &str = "Efficiency";
pub const FIDELITY_COLUMN: &str = "Fidelity";

/// Load every (efficiency, fidelity) row from a CSV file.
pub fn load_samples(path: impl AsRef<Path>) -> Result<Vec<Sample>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let samples = read_samples(file, path)?;
    debug!("loaded {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Parse samples from any reader; `path` is only used to label errors.
pub fn read_samples<R: Read>(reader: R, path: &Path) -> Result<Vec<Sample>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| csv_error(path, e))?
        .clone();
    let e_idx = column_index(&headers, EFFICIENCY_COLUMN, path)?;
    let f_idx = column_index(&headers, FIDELITY_COLUMN, path)?;

    let mut samples = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let efficiency = parse_cell(&record, e_idx, EFFICIENCY_COLUMN, line, path)?;
        let fidelity = parse_cell(&record, f_idx, FIDELITY_COLUMN, line, path)?;
        samples.push(Sample::new(efficiency, fidelity));
    }
    Ok(samples)
}

fn column_index(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| Error::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })
}

fn parse_cell(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    line: u64,
    path: &Path,
) -> Result<f64> {
    let raw = record.get(idx).unwrap_or("");
    raw.parse::<f64>().map_err(|_| Error::Parse {
        path: path.to_path_buf(),
        line,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

fn csv_error(path: &Path, source: csv::Error) -> Error {
    Error::Csv {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Vec<Sample>> {
        read_samples(text.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn test_reads_named_columns_in_any_order() {
        let text = "Fidelity,Paths,Efficiency\n0.9,2,0.5\n0.75,1,0.25\n";
        let samples = parse(text).unwrap();
        assert_eq!(
            samples,
            vec![Sample::new(0.5, 0.9), Sample::new(0.25, 0.75)]
        );
    }

    #[test]
    fn test_missing_fidelity_column() {
        let err = parse("Efficiency,Cost\n0.5,3\n").unwrap_err();
        match err {
            Error::MissingColumn { column, .. } => assert_eq!(column, "Fidelity"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_efficiency_column() {
        let err = parse("Fidelity\n0.5\n").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column, .. } if column == "Efficiency"));
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(parse("Efficiency,Fidelity\n").unwrap().is_empty());
    }

    #[test]
    fn test_non_numeric_cell_reports_line() {
        let err = parse("Efficiency,Fidelity\n0.5,0.9\nabc,0.8\n").unwrap_err();
        match err {
            Error::Parse {
                line, column, value, ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, "Efficiency");
                assert_eq!(value, "abc");
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let err = parse("Efficiency,Fidelity\n0.5,0.9\n0.4\n").unwrap_err();
        assert!(matches!(err, Error::Csv { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_samples("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
