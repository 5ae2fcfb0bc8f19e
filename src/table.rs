//! In-memory tabular model of a delimited export.
//!
//! A [`Table`] is an ordered list of rows, each holding the same number of
//! [`Cell`]s. Only [`Cell::Text`] values take part in synonym linkage; numeric
//! and missing cells are carried along so that unmerged rows can be written
//! back verbatim.
//!
//! Tables are normally produced by [`loader::TableLoader`].

pub mod loader;

use crate::error::{Result, SynmergeError};

/// Zero-based position of a row in the source file.
pub type RowIndex = usize;

/// A single field of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// A textual value, eligible to act as a synonym.
    Text(String),
    /// A value that parses as a number. Never used as a synonym.
    Number(String),
    /// An empty field or a missing-value placeholder such as `nan`.
    Missing(String),
}

impl Cell {
    /// Text content if this is a textual cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(value) => Some(value),
            _ => None,
        }
    }

    /// The field exactly as it appeared in the input.
    pub fn raw(&self) -> &str {
        match self {
            Cell::Text(value) | Cell::Number(value) | Cell::Missing(value) => value,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Cell::Text(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing(_))
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Missing(String::new())
        } else {
            Cell::Text(value.to_string())
        }
    }
}

/// One row of cells.
pub type Row = Vec<Cell>;

/// A rectangular table of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
    width: usize,
}

impl Table {
    /// Build a table, rejecting rows whose width differs from the first row.
    pub fn new(rows: Vec<Row>) -> Result<Self> {
        let width = rows.first().map(|row| row.len()).unwrap_or(0);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(SynmergeError::RaggedRow {
                    row: index,
                    expected: width,
                    found: row.len(),
                });
            }
        }
        Ok(Table { rows, width })
    }

    /// Build a table of textual cells from string slices. Empty strings
    /// become missing cells.
    pub fn from_strings<R, S>(rows: R) -> Result<Self>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|s| Cell::from(s.as_ref())).collect())
            .collect();
        Table::new(rows)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns shared by every row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get a row by index.
    pub fn row(&self, index: RowIndex) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Iterate over `(index, row)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (RowIndex, &Row)> {
        self.rows.iter().enumerate()
    }
}
