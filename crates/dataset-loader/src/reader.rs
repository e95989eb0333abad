//! CSV Readers for Feature Matrices and Label Vectors

use crate::error::LoadError;
use ndarray::{Array1, Array2};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Cell spellings treated as a missing value
const MISSING_MARKERS: [&str; 4] = ["", "NA", "NaN", "nan"];

/// Parse a single cell, mapping missing-value markers to NaN
fn parse_cell(raw: &str) -> Option<f64> {
    let cell = raw.trim();
    if MISSING_MARKERS.contains(&cell) {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}

fn open_csv(path: &Path, has_headers: bool) -> Result<csv::Reader<BufReader<File>>, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .from_reader(BufReader::new(file)))
}

/// Read a feature matrix: header row, then one numeric row per sample.
///
/// Returns the column names alongside a `rows x columns` matrix.
pub fn read_feature_matrix(path: &Path) -> Result<(Vec<String>, Array2<f64>), LoadError> {
    let mut reader = open_csv(path, true)?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::csv(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut values = Vec::new();
    let mut n_rows = 0;

    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| LoadError::csv(path, e))?;
        for (col, raw) in record.iter().enumerate() {
            let value = parse_cell(raw).ok_or_else(|| LoadError::InvalidValue {
                path: path.to_path_buf(),
                row,
                column: columns.get(col).cloned().unwrap_or_else(|| col.to_string()),
                value: raw.to_string(),
            })?;
            values.push(value);
        }
        n_rows += 1;
    }

    let matrix = Array2::from_shape_vec((n_rows, columns.len()), values).map_err(|e| {
        LoadError::Shape {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    Ok((columns, matrix))
}

/// Read a label vector: no header, exactly one numeric column.
pub fn read_label_vector(path: &Path) -> Result<Array1<f64>, LoadError> {
    let mut reader = open_csv(path, false)?;
    let mut labels = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| LoadError::csv(path, e))?;
        if record.len() != 1 {
            return Err(LoadError::Shape {
                path: path.to_path_buf(),
                reason: format!("label file must have one column, row {row} has {}", record.len()),
            });
        }
        let raw = &record[0];
        let label = parse_cell(raw).ok_or_else(|| LoadError::InvalidValue {
            path: path.to_path_buf(),
            row,
            column: "0".to_string(),
            value: raw.to_string(),
        })?;
        labels.push(label);
    }

    Ok(Array1::from_vec(labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_feature_matrix() {
        let file = write_temp("a,b\n1.0,2.0\n3.0,4.5\n5,6\n");
        let (columns, x) = read_feature_matrix(file.path()).unwrap();
        assert_eq!(columns, vec!["a", "b"]);
        assert_eq!(x.dim(), (3, 2));
        assert_eq!(x[[1, 1]], 4.5);
        assert_eq!(x[[2, 0]], 5.0);
    }

    #[test]
    fn test_missing_cells_become_nan() {
        let file = write_temp("a,b\n1.0,\nNA,2.0\n");
        let (_, x) = read_feature_matrix(file.path()).unwrap();
        assert!(x[[0, 1]].is_nan());
        assert!(x[[1, 0]].is_nan());
    }

    #[test]
    fn test_non_numeric_cell_is_rejected() {
        let file = write_temp("a,b\n1.0,2.0\n3.0,oops\n");
        match read_feature_matrix(file.path()) {
            Err(LoadError::InvalidValue { row, column, value, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "b");
                assert_eq!(value, "oops");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let file = write_temp("a,b\n1.0,2.0\n3.0\n");
        assert!(matches!(
            read_feature_matrix(file.path()),
            Err(LoadError::Csv { .. })
        ));
    }

    #[test]
    fn test_read_label_vector() {
        let file = write_temp("0\n1\n1\n");
        let y = read_label_vector(file.path()).unwrap();
        assert_eq!(y.to_vec(), vec![0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_label_file_with_two_columns() {
        let file = write_temp("0,1\n1,0\n");
        assert!(matches!(
            read_label_vector(file.path()),
            Err(LoadError::Shape { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.y");
        assert!(matches!(
            read_label_vector(&path),
            Err(LoadError::NotFound { .. })
        ));
    }
}
