//! # migaudit kernel
//!
//! Field-level reconciliation of a legacy repository export ("source")
//! against the records re-created in the new repository ("target").
//!
//! The kernel is a configuration-driven row comparator. It does not read or
//! write files; callers hand it two loaded [`Dataset`]s and a
//! [`RecordTypeConfig`] and get back an [`AuditReport`].
//!
//! ## Architecture
//!
//! ```text
//! Cell / normalize      ← raw cells, stringified lists, missing sentinel
//!     │
//! Comparator            ← one named equivalence rule per schema entry
//!     │
//! RecordTypeConfig      ← keys, label, identifiers, ordered FieldSpecs
//!     │
//! outer_join            ← every key from either side exactly once
//!     │
//! audit                 ← one ReportRow of verdicts per aligned row
//! ```

pub mod align;
pub mod cell;
pub mod comparator;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod report;
pub mod schema;
pub mod verdict;
pub mod vocab;

pub use align::{
    AlignedRow, Join, MatchState, MergedColumn, RowKey, SOURCE_SUFFIX, TARGET_SUFFIX,
    merged_columns, outer_join,
};
pub use cell::Cell;
pub use comparator::{Comparator, Shape};
pub use dataset::{Dataset, Row};
pub use engine::audit;
pub use error::{AuditError, CompareError};
pub use report::{AuditReport, AuditSummary, FieldTally, REPORT_FIXED_COLUMNS, ReportRow};
pub use schema::{ColumnPair, FieldSpec, RecordType, RecordTypeConfig, Side};
pub use verdict::{InfoVerdict, Verdict};
pub use vocab::{DEFAULT_THESIS_TYPE, Vocabularies, Vocabulary, VocabularyId};
