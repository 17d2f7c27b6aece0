//! Errors from table operations.

use migaudit_kernel::AuditError;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("{path}: I/O error: {message}")]
    Io { path: String, message: String },

    #[error("{path}: CSV error: {message}")]
    Csv { path: String, message: String },

    #[error("{path}: line {line}: JSON error: {message}")]
    Json {
        path: String,
        line: usize,
        message: String,
    },

    #[error("{path}: missing column `{column}`")]
    MissingColumn { path: String, column: String },

    #[error("chunk size must be at least 1")]
    EmptyChunk,

    #[error("{path}: {source}")]
    Dataset {
        path: String,
        #[source]
        source: AuditError,
    },
}

impl TableError {
    pub(crate) fn io(path: impl std::fmt::Display, error: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.to_string(),
            message: error.to_string(),
        }
    }

    pub(crate) fn csv(path: impl std::fmt::Display, error: impl std::fmt::Display) -> Self {
        Self::Csv {
            path: path.to_string(),
            message: error.to_string(),
        }
    }
}
