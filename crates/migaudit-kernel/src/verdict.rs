//! Per-field comparison outcomes.

use serde::{Serialize, Serializer};
use std::fmt;

/// Informational outcomes that are neither a match nor a mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InfoVerdict {
    /// The source had no value and the target holds the static default the
    /// migration injects, so the two sides cannot be compared symmetrically.
    MigrationDefault,
}

impl InfoVerdict {
    pub const fn label(self) -> &'static str {
        match self {
            Self::MigrationDefault => "INFO_MIGRATION_DEFAULT",
        }
    }
}

/// The outcome of one field comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verdict {
    Pass,
    Fail,
    Info(InfoVerdict),
}

impl Verdict {
    pub const fn from_bool(matched: bool) -> Self {
        if matched { Self::Pass } else { Self::Fail }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Info(info) => info.label(),
        }
    }

    pub const fn is_fail(self) -> bool {
        matches!(self, Self::Fail)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_report_strings() {
        assert_eq!(Verdict::Pass.to_string(), "PASS");
        assert_eq!(Verdict::Fail.to_string(), "FAIL");
        assert_eq!(
            Verdict::Info(InfoVerdict::MigrationDefault).to_string(),
            "INFO_MIGRATION_DEFAULT"
        );
    }

    #[test]
    fn from_bool_maps_to_pass_fail() {
        assert_eq!(Verdict::from_bool(true), Verdict::Pass);
        assert_eq!(Verdict::from_bool(false), Verdict::Fail);
        assert!(!Verdict::Info(InfoVerdict::MigrationDefault).is_fail());
    }
}
