//! CSV dataset loader
//!
//! Supports files where:
//! - The last column is the label, kept as a string
//! - All other columns are dense numeric features
//! - First row can be headers (automatically detected)
//! - Blank lines and lines starting with `#` are skipped

use crate::core::{Dataset, Example, PerceptronError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Labeled examples read from a CSV file
#[derive(Debug, Clone)]
pub struct CsvDataset {
    dataset: Dataset<String>,
    header: Option<Vec<String>>,
}

impl CsvDataset {
    /// Load a dataset from a CSV file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a dataset from a reader, detecting a header row
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, true)
    }

    /// Load a dataset from a reader with explicit header option
    pub fn from_reader_with_options<R: BufRead>(reader: R, auto_detect_header: bool) -> Result<Self> {
        let mut examples = Vec::new();
        let mut header = None;
        let mut first_row = true;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if first_row {
                first_row = false;
                if auto_detect_header && Self::is_header_line(line) {
                    header = Some(line.split(',').map(|f| f.trim().to_string()).collect());
                    continue;
                }
            }

            examples.push(Self::parse_data_line(line, line_no + 1)?);
        }

        if examples.is_empty() {
            return Err(PerceptronError::EmptyDataset);
        }

        let dataset = Dataset::new(examples)?;
        Ok(Self { dataset, header })
    }

    /// Column names, if the file had a header row
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    pub fn dataset(&self) -> &Dataset<String> {
        &self.dataset
    }

    pub fn into_dataset(self) -> Dataset<String> {
        self.dataset
    }

    /// Check if a line appears to be a header
    fn is_header_line(line: &str) -> bool {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 2 {
            return false;
        }

        // Label column is excluded since labels may be names
        let non_numeric_count = fields
            .iter()
            .take(fields.len() - 1)
            .filter(|field| field.trim().parse::<f64>().is_err())
            .count();

        non_numeric_count > (fields.len() - 1) / 2
    }

    fn parse_data_line(line: &str, line_no: usize) -> Result<Example<String>> {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
        if fields.len() < 2 {
            return Err(PerceptronError::Parse(format!(
                "line {line_no}: expected at least one feature and a label, got '{line}'"
            )));
        }

        let Some((label, features)) = fields.split_last() else {
            return Err(PerceptronError::Parse(format!("line {line_no}: empty row")));
        };
        if label.is_empty() {
            return Err(PerceptronError::Parse(format!("line {line_no}: empty label")));
        }

        let features = features
            .iter()
            .enumerate()
            .map(|(col, field)| {
                field.parse::<f64>().map_err(|_| {
                    PerceptronError::Parse(format!(
                        "line {line_no}: invalid feature value at column {}: '{field}'",
                        col + 1
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(Example::new(features, label.to_string()))
    }
}
