//! # migaudit-table
//!
//! File layer around the kernel.
//!
//! This crate provides:
//! - CSV loading into kernel `Dataset`s, honouring the missing-sentinel rule
//! - Atomic CSV writers for audit reports and joined datasets
//! - SHA-256 digests of input snapshots
//! - JSON flattening of catalogue records into allowlisted CSV rows
//! - Row filter, split and combine utilities
//!
//! ## Data flow
//!
//! ```text
//! CSV snapshot ──read_dataset──▶ Dataset ──audit──▶ AuditReport
//!                                                     │
//!                                  write_report_csv ◀─┘  (tmp + rename)
//! ```

pub mod csv_io;
pub mod digest;
pub mod error;
pub mod flatten;
pub mod ops;

pub use csv_io::{
    LoadOptions, read_dataset, read_dataset_from_reader, write_aligned_csv, write_dataset_csv,
    write_report_csv,
};
pub use digest::file_digest;
pub use error::TableError;
pub use flatten::{FlattenStats, flatten_allowlist, flatten_jsonl, flatten_record};
pub use ops::{SplitChunk, combine, filter_by_ids, split};
