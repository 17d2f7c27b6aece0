//! Raw cell values.
//!
//! A CSV snapshot has no native null, but the legacy exporter and the outer
//! join both produce "no value here" cells that must stay distinct from the
//! empty string. [`Cell::Missing`] is that sentinel.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The shared missing cell, handed out by reference for absent columns.
pub static MISSING: Cell = Cell::Missing;

/// One raw cell, kept as text with no type coercion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Missing,
    Text(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// The text content, or `None` for the missing sentinel.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Missing => None,
            Self::Text(value) => Some(value),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Missing, or text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.as_text().is_none_or(|value| value.trim().is_empty())
    }

    /// Text for serialization; the missing sentinel renders empty.
    pub fn render(&self) -> &str {
        self.as_text().unwrap_or("")
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Missing, Cell::from)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("<missing>"),
            Self::Text(value) => f.write_str(value),
        }
    }
}
