//! Error types for kernel operations.

use crate::schema::Side;
use crate::vocab::VocabularyId;

/// Errors that abort an audit run.
///
/// Mismatched data is never an error: it is a `FAIL` verdict. These variants
/// cover bad configuration and comparator invariant violations only.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The record-type selector names nothing in the registry.
    #[error(
        "unknown record type `{0}`; expected one of: community, collection, bitstream, item"
    )]
    UnknownRecordType(String),

    /// A dataset lacks a column the record type reads.
    #[error("{side} dataset is missing column `{column}` required by record type `{record_type}`")]
    MissingColumn {
        side: Side,
        column: String,
        record_type: String,
    },

    /// A header row names the same column twice.
    #[error("duplicate column `{column}` in header row")]
    DuplicateColumn { column: String },

    /// A schema entry declares columns its comparator cannot consume.
    #[error(
        "field `{field}`: comparator `{comparator}` expects {expected}, got {source_columns} source and {target_columns} target column(s)"
    )]
    SchemaShape {
        field: String,
        comparator: &'static str,
        expected: String,
        source_columns: usize,
        target_columns: usize,
    },

    /// A vocabulary extension targeted a closed table.
    #[error("vocabulary `{0}` is fixed and cannot be extended")]
    FixedVocabulary(VocabularyId),

    /// A comparator failed hard on one row.
    #[error("row `{key}` field `{field}`: {source}")]
    Compare {
        key: String,
        field: String,
        #[source]
        source: CompareError,
    },
}

/// Hard failures raised by a comparator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompareError {
    /// A vocabulary-mapping comparator met a term outside its table.
    #[error("term `{term}` is not in the {vocabulary} vocabulary")]
    UnmappedTerm {
        vocabulary: VocabularyId,
        term: String,
    },
}
