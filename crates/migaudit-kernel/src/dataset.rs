//! In-memory tabular datasets.

use crate::cell::{Cell, MISSING};
use crate::error::AuditError;
use std::collections::HashMap;

/// An ordered set of rows under one header. Cells are kept as loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dataset {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    pub fn new<I, S>(headers: I) -> Result<Self, AuditError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dataset = Self::default();
        for header in headers {
            let header = header.into();
            if dataset.index.contains_key(&header) {
                return Err(AuditError::DuplicateColumn { column: header });
            }
            dataset.index.insert(header.clone(), dataset.headers.len());
            dataset.headers.push(header);
        }
        Ok(dataset)
    }

    /// Build a dataset from text rows. `None` cells are missing.
    pub fn from_rows<'a, R>(headers: &[&str], rows: R) -> Result<Self, AuditError>
    where
        R: IntoIterator<Item = Vec<Option<&'a str>>>,
    {
        let mut dataset = Self::new(headers.iter().copied())?;
        for row in rows {
            dataset.push_row(row.into_iter().map(Cell::from).collect());
        }
        Ok(dataset)
    }

    /// Append a row. Short rows are padded with missing cells; surplus
    /// cells beyond the header are dropped.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        cells.resize(self.headers.len(), Cell::Missing);
        self.rows.push(cells);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.rows.len()).then_some(Row {
            dataset: self,
            index,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.rows.len()).map(move |index| Row {
            dataset: self,
            index,
        })
    }
}

/// A borrowed view of one dataset row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    dataset: &'a Dataset,
    index: usize,
}

impl<'a> Row<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// The cell under `column`, or the missing sentinel if the dataset has
    /// no such column.
    pub fn get(&self, column: &str) -> &'a Cell {
        self.dataset
            .column(column)
            .and_then(|at| self.dataset.rows[self.index].get(at))
            .unwrap_or(&MISSING)
    }

    pub fn cells(&self) -> &'a [Cell] {
        &self.dataset.rows[self.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_headers_are_rejected() {
        let err = Dataset::new(["id", "title", "id"]).expect_err("id repeats");
        assert!(matches!(err, AuditError::DuplicateColumn { ref column } if column == "id"));
    }

    #[test]
    fn short_rows_pad_with_missing() {
        let mut dataset = Dataset::new(["id", "title"]).expect("headers");
        dataset.push_row(vec![Cell::text("1")]);
        let row = dataset.row(0).expect("row 0");
        assert_eq!(row.get("id"), &Cell::text("1"));
        assert_eq!(row.get("title"), &Cell::Missing);
        assert_eq!(row.get("absent"), &Cell::Missing);
    }

    #[test]
    fn from_rows_keeps_missing_distinct_from_empty() {
        let dataset = Dataset::from_rows(&["a", "b"], [vec![Some(""), None]]).expect("dataset");
        let row = dataset.row(0).expect("row 0");
        assert_eq!(row.get("a"), &Cell::text(""));
        assert!(row.get("b").is_missing());
        assert_eq!(dataset.len(), 1);
        assert!(dataset.row(1).is_none());
    }
}
