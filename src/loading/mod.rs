//! Reading whitespace-delimited telemetry tables into a [`Dataset`].
//!
//! The tabular contract: the first line is a column header and is skipped;
//! every following non-blank line is one record holding exactly the
//! dataset's number of numeric fields followed by a single label token from
//! {S, T, U, V, TX}. In the reference domain a record carries eight summary
//! measurements of a 12-hour period (mean, median, standard deviation, and
//! interquartile range of depth, then the same four for temperature) and the
//! expert-assigned category.
//!
//! The classification core performs no I/O of its own; this module is the
//! concrete dataset source feeding it.

use crate::dataset::{Dataset, Label, Sample};
use crate::error::{ClasificarError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Reads a labelled telemetry table from a file.
///
/// # Errors
///
/// Returns [`ClasificarError::Io`] when the file cannot be read, and the
/// same contract errors as [`parse_dataset`] otherwise.
pub fn read_dataset<P: AsRef<Path>>(path: P, n_features: usize) -> Result<Dataset> {
    parse_dataset(File::open(path)?, n_features)
}

/// Parses a labelled telemetry table from any reader.
///
/// # Errors
///
/// Returns [`ClasificarError::MalformedRecord`] for a record with the wrong
/// field count or a non-numeric field, [`ClasificarError::UnknownLabel`] for
/// a label token outside the closed set, [`ClasificarError::EmptyDataset`]
/// when no records follow the header, and [`ClasificarError::Io`] for read
/// failures.
pub fn parse_dataset<R: Read>(reader: R, n_features: usize) -> Result<Dataset> {
    let reader = BufReader::new(reader);
    let mut samples = Vec::new();

    // Line 1 is the column header.
    for (line_no, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        samples.push(parse_record(&line, line_no + 1, n_features)?);
    }

    Dataset::new(samples)
}

/// Parses one record: `n_features` numeric fields, then one label token.
fn parse_record(line: &str, line_no: usize, n_features: usize) -> Result<Sample> {
    let mut fields = line.split_whitespace();

    let mut features = Vec::with_capacity(n_features);
    for position in 0..n_features {
        let field = fields.next().ok_or_else(|| ClasificarError::MalformedRecord {
            line: line_no,
            message: format!("expected {n_features} numeric fields, found {position}"),
        })?;
        let value = field
            .parse::<f32>()
            .map_err(|_| ClasificarError::MalformedRecord {
                line: line_no,
                message: format!("field {} is not numeric: {field:?}", position + 1),
            })?;
        features.push(value);
    }

    let token = fields.next().ok_or_else(|| ClasificarError::MalformedRecord {
        line: line_no,
        message: "missing label token".to_string(),
    })?;
    let label: Label = token.parse()?;

    if let Some(extra) = fields.next() {
        return Err(ClasificarError::MalformedRecord {
            line: line_no,
            message: format!("unexpected trailing field {extra:?}"),
        });
    }

    Ok(Sample::new(features, label))
}
