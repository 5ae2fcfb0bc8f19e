//! Delimited-file loader.
//!
//! Reads a header-less delimited export into a [`Table`]:
//! ```text
//! HMDB0000122#D-Glucose#Dextrose#Glucose
//! HMDB0000169#Mannose#D-Mannose#nan
//! ```
//!
//! Every line becomes one row. Fields are classified into [`Cell`] kinds:
//! empty fields and configured placeholder tokens are missing; in a column
//! whose every present field parses as a number, fields are numeric;
//! everything else is text. A number-like value in an otherwise textual
//! column stays text and can act as a synonym.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use log::debug;

use crate::error::{Result, SynmergeError};
use crate::table::{Cell, Row, Table};

/// Placeholder tokens treated as missing values unless configured otherwise.
pub const DEFAULT_MISSING_TOKENS: &[&str] = &["nan", "NaN", "NA", "N/A", "null", "NULL"];

/// Loads delimited text into a [`Table`].
#[derive(Debug, Clone)]
pub struct TableLoader {
    /// Field delimiter (default: '#')
    delimiter: u8,
    /// Tokens that mark a missing value
    missing_tokens: Vec<String>,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TableLoader {
    /// Create a loader for '#'-delimited input.
    pub fn new() -> Self {
        TableLoader {
            delimiter: b'#',
            missing_tokens: DEFAULT_MISSING_TOKENS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Set a custom delimiter character.
    ///
    /// Only single-byte ASCII delimiters are accepted.
    pub fn with_delimiter(mut self, delimiter: char) -> Result<Self> {
        if !delimiter.is_ascii() || matches!(delimiter, '"' | '\n' | '\r') {
            return Err(SynmergeError::invalid_argument(format!(
                "unsupported delimiter {delimiter:?}"
            )));
        }
        self.delimiter = delimiter as u8;
        Ok(self)
    }

    /// Replace the set of missing-value placeholder tokens.
    pub fn with_missing_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Load a table from a file on disk.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            SynmergeError::config(format!("Cannot open input {}: {e}", path.display()))
        })?;
        let table = self.load_from_reader(file)?;
        debug!(
            "Loaded {} rows x {} columns from {}",
            table.len(),
            table.width(),
            path.display()
        );
        Ok(table)
    }

    /// Load a table from any reader.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            // Width is checked by Table::new so the error names the row.
            .flexible(true)
            .from_reader(reader);

        let mut records: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            records.push(record.iter().map(str::to_string).collect());
        }

        let width = records.first().map(Vec::len).unwrap_or(0);
        let numeric_columns: Vec<bool> = (0..width)
            .map(|column| self.is_numeric_column(&records, column))
            .collect();

        let rows: Vec<Row> = records
            .into_iter()
            .map(|fields| {
                fields
                    .into_iter()
                    .enumerate()
                    .map(|(column, field)| {
                        let numeric = numeric_columns.get(column).copied().unwrap_or(false);
                        self.classify(field, numeric)
                    })
                    .collect()
            })
            .collect();

        Table::new(rows)
    }

    /// Decide the cell kind of a raw field lying in a numeric or textual
    /// column.
    pub fn classify(&self, field: String, numeric_column: bool) -> Cell {
        if self.is_missing(&field) {
            Cell::Missing(field)
        } else if numeric_column {
            Cell::Number(field)
        } else {
            Cell::Text(field)
        }
    }

    fn is_missing(&self, field: &str) -> bool {
        field.is_empty() || self.missing_tokens.iter().any(|token| token == field)
    }

    /// A column is numeric when it has at least one present field and every
    /// present field parses as a number.
    fn is_numeric_column(&self, records: &[Vec<String>], column: usize) -> bool {
        let mut present = records
            .iter()
            .filter_map(|fields| fields.get(column))
            .filter(|field| !self.is_missing(field))
            .peekable();
        present.peek().is_some() && present.all(|field| is_numeric(field))
    }
}

fn is_numeric(field: &str) -> bool {
    field.parse::<i64>().is_ok()
        || (field.parse::<f64>().is_ok() && field.bytes().any(|b| b.is_ascii_digit()))
}
