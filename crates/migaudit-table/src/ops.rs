//! Row utilities run before an audit: filter, split, combine.

use crate::error::TableError;
use migaudit_kernel::{Cell, Dataset};
use std::collections::HashSet;
use tracing::info;

fn dataset_error(origin: &str) -> impl FnOnce(migaudit_kernel::AuditError) -> TableError + '_ {
    move |source| TableError::Dataset {
        path: origin.to_string(),
        source,
    }
}

/// Keep the rows of `input` whose `column` value appears in the same column
/// of `ids`. Blank ids never match.
pub fn filter_by_ids(input: &Dataset, ids: &Dataset, column: &str) -> Result<Dataset, TableError> {
    for (origin, dataset) in [("input", input), ("ids", ids)] {
        if !dataset.has_column(column) {
            return Err(TableError::MissingColumn {
                path: origin.to_string(),
                column: column.to_string(),
            });
        }
    }
    let wanted: HashSet<&str> = ids
        .rows()
        .filter_map(|row| row.get(column).as_text())
        .filter(|id| !id.trim().is_empty())
        .collect();

    let mut out = Dataset::new(input.headers().iter().cloned()).map_err(dataset_error("input"))?;
    for row in input.rows() {
        if row
            .get(column)
            .as_text()
            .is_some_and(|id| wanted.contains(id))
        {
            out.push_row(row.cells().to_vec());
        }
    }
    info!(
        kept = out.len(),
        total = input.len(),
        ids = wanted.len(),
        "filtered rows by id"
    );
    Ok(out)
}

/// One partition produced by [`split`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitChunk {
    /// Zero-based index of the first row.
    pub start: usize,
    /// `start + size - 1`, even when the final chunk is short.
    pub end: usize,
    pub rows: Dataset,
}

impl SplitChunk {
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{prefix}_items_{}_to_{}.csv", self.start, self.end)
    }
}

/// Partition rows into chunks of `size`, each carrying the full header.
pub fn split(input: &Dataset, size: usize) -> Result<Vec<SplitChunk>, TableError> {
    if size == 0 {
        return Err(TableError::EmptyChunk);
    }
    let mut chunks: Vec<SplitChunk> = Vec::new();
    for row in input.rows() {
        let index = row.index();
        if index % size == 0 {
            chunks.push(SplitChunk {
                start: index,
                end: index + size - 1,
                rows: Dataset::new(input.headers().iter().cloned())
                    .map_err(dataset_error("input"))?,
            });
        }
        if let Some(chunk) = chunks.last_mut() {
            chunk.rows.push_row(row.cells().to_vec());
        }
    }
    info!(rows = input.len(), chunks = chunks.len(), size, "split rows");
    Ok(chunks)
}

/// Merge two exports with overlapping headers. The output header is the
/// first header followed by the second's new columns; rows keep their
/// order, first input then second, with absent columns missing.
pub fn combine(first: &Dataset, second: &Dataset) -> Result<Dataset, TableError> {
    let mut headers: Vec<String> = first.headers().to_vec();
    for header in second.headers() {
        if !headers.contains(header) {
            headers.push(header.clone());
        }
    }
    let mut out = Dataset::new(headers.iter().cloned()).map_err(dataset_error("combined"))?;
    for dataset in [first, second] {
        for row in dataset.rows() {
            out.push_row(
                headers
                    .iter()
                    .map(|header| row.get(header).clone())
                    .collect::<Vec<Cell>>(),
            );
        }
    }
    info!(
        first = first.len(),
        second = second.len(),
        columns = headers.len(),
        "combined datasets"
    );
    Ok(out)
}
