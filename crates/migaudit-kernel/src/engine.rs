//! One audit run for one record type.

use crate::align::{AlignedRow, outer_join};
use crate::cell::Cell;
use crate::dataset::Dataset;
use crate::error::AuditError;
use crate::report::{AuditReport, ReportRow};
use crate::schema::{ColumnPair, FieldSpec, RecordTypeConfig, Side};
use crate::verdict::Verdict;
use crate::vocab::Vocabularies;
use tracing::{debug, info, instrument};

/// Compare `source` against `target` under `config`.
///
/// Configuration problems are reported before any row is compared. A
/// comparator hard failure aborts the run with the row key attached; no
/// partial report is returned.
#[instrument(level = "debug", skip_all, fields(record_type = %config.record_type))]
pub fn audit(
    config: &RecordTypeConfig,
    source: &Dataset,
    target: &Dataset,
    vocab: &Vocabularies,
) -> Result<AuditReport, AuditError> {
    config.validate()?;
    check_columns(config, Side::Source, source)?;
    check_columns(config, Side::Target, target)?;

    let join = outer_join(
        source,
        config.key(Side::Source),
        target,
        config.key(Side::Target),
    );
    let mut rows = Vec::with_capacity(join.key_count());
    for aligned in join.rows() {
        rows.push(compare_row(config, &aligned, vocab)?);
    }

    let report = AuditReport {
        record_type: config.record_type,
        fields: config.fields.iter().map(|f| f.label).collect(),
        rows,
    };
    let summary = report.summary();
    info!(
        rows = summary.rows,
        matched = summary.matched,
        source_only = summary.source_only,
        target_only = summary.target_only,
        failures = summary.failures(),
        "audit complete"
    );
    Ok(report)
}

fn check_columns(
    config: &RecordTypeConfig,
    side: Side,
    dataset: &Dataset,
) -> Result<(), AuditError> {
    for column in config.required_columns(side) {
        if !dataset.has_column(column) {
            return Err(AuditError::MissingColumn {
                side,
                column: column.to_string(),
                record_type: config.record_type.to_string(),
            });
        }
    }
    Ok(())
}

fn compare_row(
    config: &RecordTypeConfig,
    row: &AlignedRow<'_>,
    vocab: &Vocabularies,
) -> Result<ReportRow, AuditError> {
    let mut verdicts = Vec::with_capacity(config.fields.len());
    for field in &config.fields {
        verdicts.push(compare_field(field, row, vocab)?);
    }
    let label = config
        .label
        .iter()
        .map(|(side, column)| row.cell(*side, column))
        .find(|cell| !cell.is_blank())
        .map(Cell::render)
        .unwrap_or("");
    let render = |pair: &ColumnPair, side: Side| {
        pair.get(side)
            .map_or("", |column| row.cell(side, column).render())
            .to_string()
    };
    debug!(key = %row.key, state = ?row.match_state(), "compared row");
    Ok(ReportRow {
        key: row.key.to_string(),
        label: label.to_string(),
        source_last_modified: render(&config.last_modified, Side::Source),
        target_last_modified: render(&config.last_modified, Side::Target),
        source_id: render(&config.identifier, Side::Source),
        target_id: render(&config.identifier, Side::Target),
        verdicts,
        match_state: row.match_state(),
    })
}

fn compare_field(
    field: &FieldSpec,
    row: &AlignedRow<'_>,
    vocab: &Vocabularies,
) -> Result<Verdict, AuditError> {
    let source: Vec<&Cell> = field
        .source
        .iter()
        .map(|c| row.cell(Side::Source, c))
        .collect();
    let target: Vec<&Cell> = field
        .target
        .iter()
        .map(|c| row.cell(Side::Target, c))
        .collect();
    field
        .comparator
        .compare(&source, &target, vocab)
        .map_err(|source| AuditError::Compare {
            key: row.key.to_string(),
            field: field.label.to_string(),
            source,
        })
}
