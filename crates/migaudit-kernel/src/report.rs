//! Audit output: one row of verdicts per aligned key, plus tallies.

use crate::align::MatchState;
use crate::schema::RecordType;
use crate::verdict::Verdict;
use serde::Serialize;
use std::fmt;

/// Identity columns that precede the per-field verdicts.
pub const REPORT_FIXED_COLUMNS: [&str; 6] = [
    "index",
    "label",
    "source.last_modified",
    "target.last_modified",
    "source.id",
    "target.id",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub key: String,
    pub label: String,
    pub source_last_modified: String,
    pub target_last_modified: String,
    pub source_id: String,
    pub target_id: String,
    pub verdicts: Vec<Verdict>,
    pub match_state: MatchState,
}

impl ReportRow {
    /// The row as output cells, in header order.
    pub fn cells(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(REPORT_FIXED_COLUMNS.len() + self.verdicts.len());
        out.extend([
            self.key.as_str(),
            self.label.as_str(),
            self.source_last_modified.as_str(),
            self.target_last_modified.as_str(),
            self.source_id.as_str(),
            self.target_id.as_str(),
        ]);
        out.extend(self.verdicts.iter().map(|v| v.label()));
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub record_type: RecordType,
    pub fields: Vec<&'static str>,
    pub rows: Vec<ReportRow>,
}

impl AuditReport {
    pub fn header(&self) -> Vec<&str> {
        REPORT_FIXED_COLUMNS
            .iter()
            .copied()
            .chain(self.fields.iter().copied())
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.rows
            .iter()
            .any(|row| row.verdicts.iter().any(|v| v.is_fail()))
    }

    pub fn summary(&self) -> AuditSummary {
        let mut fields: Vec<FieldTally> = self
            .fields
            .iter()
            .map(|label| FieldTally {
                label: (*label).to_string(),
                pass: 0,
                fail: 0,
                info: 0,
            })
            .collect();
        let mut summary = AuditSummary {
            record_type: self.record_type,
            rows: self.rows.len(),
            matched: 0,
            source_only: 0,
            target_only: 0,
            fields: Vec::new(),
        };
        for row in &self.rows {
            match row.match_state {
                MatchState::Matched => summary.matched += 1,
                MatchState::SourceOnly => summary.source_only += 1,
                MatchState::TargetOnly => summary.target_only += 1,
            }
            for (tally, verdict) in fields.iter_mut().zip(&row.verdicts) {
                match verdict {
                    Verdict::Pass => tally.pass += 1,
                    Verdict::Fail => tally.fail += 1,
                    Verdict::Info(_) => tally.info += 1,
                }
            }
        }
        summary.fields = fields;
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTally {
    pub label: String,
    pub pass: usize,
    pub fail: usize,
    pub info: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub record_type: RecordType,
    pub rows: usize,
    pub matched: usize,
    pub source_only: usize,
    pub target_only: usize,
    pub fields: Vec<FieldTally>,
}

impl AuditSummary {
    pub fn failures(&self) -> usize {
        self.fields.iter().map(|f| f.fail).sum()
    }
}

impl fmt::Display for AuditSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} audit", self.record_type)?;
        writeln!(
            f,
            "  rows: {} (matched {}, source-only {}, target-only {})",
            self.rows, self.matched, self.source_only, self.target_only
        )?;
        let width = self.fields.iter().map(|t| t.label.len()).max().unwrap_or(0);
        for tally in &self.fields {
            writeln!(
                f,
                "  {:<width$}  pass {:>5}  fail {:>5}  info {:>5}",
                tally.label, tally.pass, tally.fail, tally.info
            )?;
        }
        Ok(())
    }
}
