//! Flatten catalogue JSON records into allowlisted CSV rows.
//!
//! Nested objects become dotted keys. Metadata entries are lists of
//! `{"value": …}` objects; for known metadata fields the values collapse into
//! one stringified list cell, and `ual.jupiterId` collapses to its first
//! value. Other lists of objects expand by index (`key.0.field`) and scalar
//! lists are collected. Anything outside the record type's allowlist is
//! dropped.

use crate::error::TableError;
use migaudit_kernel::normalize::render_stringified_list;
use migaudit_kernel::{Cell, Dataset, RecordType};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::io::BufRead;
use tracing::{debug, info, warn};

const COMMUNITY_COLUMNS: &[&str] = &[
    "uuid",
    "name",
    "handle",
    "metadata",
    "lastModified",
    "type",
    "metadata.dc.description",
    "metadata.dc.description.abstract",
    "metadata.dc.identifier.uri",
    "metadata.dc.rights",
    "metadata.dc.title",
];

const COLLECTION_COLUMNS: &[&str] = &[
    "handle",
    "name",
    "lastModified",
    "type",
    "uuid",
    "provenance.ual.jupiterId.collection",
    "provenance.ual.jupiterId.community",
    "metadata.dc.description",
    "metadata.dc.description.abstract",
    "metadata.dc.identifier.uri",
    "metadata.dc.provenance.0.authority",
    "metadata.dc.provenance.0.confidence",
    "metadata.dc.provenance.0.language",
    "metadata.dc.provenance.0.place",
    "metadata.dc.provenance.0.value",
    "metadata.dc.title",
    "metadata.dspace.entity.type",
];

const ITEM_COLUMNS: &[&str] = &[
    "uuid",
    "metadata.ual.jupiterId",
    "handle",
    "lastModified",
    "name",
    "provenance.ual.jupiterId.item",
    "provenance.ual.jupiterId.collection",
    "type",
    "access_rights",
    "metadata.dc.contributor",
    "metadata.dc.contributor.author",
    "metadata.dc.contributor.advisor",
    "metadata.dc.contributor.other",
    "metadata.dc.coverage.spatial",
    "metadata.dc.coverage.temporal",
    "metadata.dc.creator",
    "metadata.dc.date.accessioned",
    "metadata.dc.date.available",
    "metadata.dc.date.created",
    "metadata.dc.date.issued",
    "metadata.dc.description",
    "metadata.dc.description.abstract",
    "metadata.dc.description.provenance",
    "metadata.dc.description.sponsorship",
    "metadata.dc.identifier.citation",
    "metadata.dc.identifier.govdoc",
    "metadata.dc.identifier.isbn",
    "metadata.dc.identifier.ismn",
    "metadata.dc.identifier.issn",
    "metadata.dc.identifier.other",
    "metadata.dc.identifier.doi",
    "metadata.dc.identifier.uri",
    "metadata.dc.language",
    "metadata.dc.language.iso",
    "metadata.dc.publisher",
    "metadata.dc.relation",
    "metadata.dc.relation.isversionof",
    "metadata.dc.relation.ispartof",
    "metadata.dc.relation.ispartofseries",
    "metadata.dc.rights",
    "metadata.dc.rights.license",
    "metadata.dc.source",
    "metadata.dc.subject",
    "metadata.dc.title",
    "metadata.dc.title.alternative",
    "metadata.dc.type",
    "metadata.dcterms.accessRights",
    "metadata.dcterms.available",
    "metadata.dcterms.source",
    "metadata.dspace.entity.type",
    "metadata.local.embargo.lift",
    "metadata.local.embargo.terms",
    "metadata.person.email",
    "metadata.person.familyName",
    "metadata.person.givenName",
    "metadata.relation.isAuthorOfPublication",
    "metadata.relation.isAuthorOfPublication.latestForDiscovery",
    "metadata.relation.isPublicationOfAuthor",
    "metadata.relation.isPublicationOfAuthor.latestForDiscovery",
    "metadata.thesis.degree.discipline",
    "metadata.thesis.degree.grantor",
    "metadata.thesis.degree.level",
    "metadata.thesis.degree.name",
    "metadata.ual.date.createdInERA",
    "metadata.ual.date.createdInJupiter",
    "metadata.ual.date.graduation",
    "metadata.ual.date.updatedInJupiter",
    "metadata.ual.department",
    "metadata.ual.depositor",
    "metadata.ual.fedora3Handle",
    "metadata.ual.fedora3UUID",
    "metadata.ual.jupiterCollection",
    "metadata.ual.jupiterFilename",
    "metadata.ual.jupiterThumbnail",
    "metadata.ual.hydraNoid",
    "metadata.ual.ingestBatch",
    "metadata.ual.owner",
    "metadata.ual.recordCreatedInJupiter",
    "metadata.ual.sortYear",
    "metadata.ual.stats.jupiterDownloads",
    "metadata.ual.stats.jupiterViews",
];

const BITSTREAM_COLUMNS: &[&str] = &[
    "item.handle",
    "item.uuid",
    "item.name",
    "provenance.ual.jupiterId.item",
    "bitstream.bundleName",
    "bitstream.sizeBytes",
    "bitstream.id",
    "bitstream.name",
    "bitstream.sequenceId",
    "bitstream.checksum.value",
    "bitstream.checksum_algorithm",
    "bitstream.uuid",
    "bitstream.metadata.dc.title",
    "bitstream.metadata.dc.source.0.value",
    "bitstream.metadata.dc.description",
    "bundle.name",
];

// Metadata fields whose `[{value: …}, …]` entries collapse to a value list.
const LIST_OF_VALUES_FIELDS: &[&str] = &[
    "dc.contributor",
    "dc.contributor.advisor",
    "dc.contributor.author",
    "dc.contributor.other",
    "dc.coverage.spatial",
    "dc.coverage.temporal",
    "dc.creator",
    "dc.date.accessioned",
    "dc.date.available",
    "dc.date.created",
    "dc.date.issued",
    "dc.description",
    "dc.description.abstract",
    "dc.description.provenance",
    "dc.description.sponsorship",
    "dc.identifier.citation",
    "dc.identifier.govdoc",
    "dc.identifier.isbn",
    "dc.identifier.ismn",
    "dc.identifier.issn",
    "dc.identifier.other",
    "dc.identifier.doi",
    "dc.identifier.uri",
    "dc.language",
    "dc.language.iso",
    "dc.publisher",
    "dc.relation",
    "dc.relation.isversionof",
    "dc.relation.ispartof",
    "dc.relation.ispartofseries",
    "dc.rights",
    "dc.rights.license",
    "dc.source",
    "dc.subject",
    "dc.title",
    "dc.title.alternative",
    "dc.type",
    "dcterms.accessRights",
    "dcterms.available",
    "dcterms.source",
    "dspace.entity.type",
    "local.embargo.lift",
    "local.embargo.terms",
    "person.email",
    "person.familyName",
    "person.givenName",
    "relation.isAuthorOfPublication",
    "relation.isAuthorOfPublication.latestForDiscovery",
    "relation.isPublicationOfAuthor",
    "relation.isPublicationOfAuthor.latestForDiscovery",
    "thesis.degree.discipline",
    "thesis.degree.grantor",
    "thesis.degree.level",
    "thesis.degree.name",
    "ual.date.createdInERA",
    "ual.date.createdInJupiter",
    "ual.date.graduation",
    "ual.date.updatedInJupiter",
    "ual.department",
    "ual.depositor",
    "ual.fedora3Handle",
    "ual.fedora3UUID",
    "ual.jupiterCollection",
    "ual.jupiterFilename",
    "ual.jupiterThumbnail",
    "ual.hydraNoid",
    "ual.ingestBatch",
    "ual.owner",
    "ual.recordCreatedInJupiter",
    "ual.sortYear",
    "ual.stats.jupiterDownloads",
    "ual.stats.jupiterViews",
    "provenance.ual.jupiterId.item",
];

const SINGLE_VALUE_FIELDS: &[&str] = &["ual.jupiterId"];

/// Output columns for a record type, in header order.
pub fn flatten_allowlist(record_type: RecordType) -> &'static [&'static str] {
    match record_type {
        RecordType::Community => COMMUNITY_COLUMNS,
        RecordType::Collection => COLLECTION_COLUMNS,
        RecordType::Bitstream => BITSTREAM_COLUMNS,
        RecordType::Item => ITEM_COLUMNS,
    }
}

/// Counters from one flatten run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenStats {
    pub records: usize,
    pub dropped_keys: usize,
}

/// Flatten one record into cells aligned with `allowlist`.
pub fn flatten_record(record: &Map<String, Value>, allowlist: &[&str]) -> (Vec<Cell>, usize) {
    let allowed: HashSet<&str> = allowlist.iter().copied().collect();
    let mut flat = BTreeMap::new();
    let mut dropped = 0;
    flatten_into(record, "", &allowed, &mut flat, &mut dropped);
    let cells = allowlist
        .iter()
        .map(|column| flat.remove(*column).map_or(Cell::Missing, Cell::Text))
        .collect();
    dropped += flat.len();
    for key in flat.keys() {
        debug!(key = key.as_str(), "flattened key outside allowlist dropped");
    }
    (cells, dropped)
}

/// Flatten a JSON Lines stream of records into a dataset. Blank lines are
/// skipped.
pub fn flatten_jsonl(
    reader: impl BufRead,
    origin: &str,
    record_type: RecordType,
) -> Result<(Dataset, FlattenStats), TableError> {
    let allowlist = flatten_allowlist(record_type);
    let mut dataset = Dataset::new(allowlist.iter().copied()).map_err(|source| {
        TableError::Dataset {
            path: origin.to_string(),
            source,
        }
    })?;
    let mut stats = FlattenStats::default();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| TableError::io(origin, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(trimmed).map_err(|e| TableError::Json {
            path: origin.to_string(),
            line: line_no + 1,
            message: e.to_string(),
        })?;
        let Value::Object(record) = value else {
            return Err(TableError::Json {
                path: origin.to_string(),
                line: line_no + 1,
                message: "expected a JSON object".to_string(),
            });
        };
        let (cells, dropped) = flatten_record(&record, allowlist);
        dataset.push_row(cells);
        stats.records += 1;
        stats.dropped_keys += dropped;
    }
    info!(
        origin,
        record_type = %record_type,
        records = stats.records,
        dropped_keys = stats.dropped_keys,
        "flattened records"
    );
    Ok((dataset, stats))
}

fn flatten_into(
    object: &Map<String, Value>,
    prefix: &str,
    allowed: &HashSet<&str>,
    out: &mut BTreeMap<String, String>,
    dropped: &mut usize,
) {
    for (key, value) in object {
        let flat_key = format!("{prefix}{key}");
        match value {
            Value::Object(child) => {
                flatten_into(child, &format!("{flat_key}."), allowed, out, dropped);
            }
            Value::Array(items) if SINGLE_VALUE_FIELDS.contains(&key.as_str()) => {
                match items.first().and_then(metadata_value) {
                    Some(first) => {
                        out.insert(flat_key, first);
                    }
                    None => warn!(key = flat_key.as_str(), "single-value field has no value"),
                }
            }
            Value::Array(items) if LIST_OF_VALUES_FIELDS.contains(&key.as_str()) => {
                let values: Vec<String> = items.iter().filter_map(metadata_value).collect();
                out.insert(flat_key, render_stringified_list(&values));
            }
            Value::Array(items) => {
                let mut scalars = Vec::new();
                for (i, item) in items.iter().enumerate() {
                    match item {
                        Value::Object(child) => flatten_into(
                            child,
                            &format!("{flat_key}.{i}."),
                            allowed,
                            out,
                            dropped,
                        ),
                        other => {
                            if let Some(text) = scalar_text(other) {
                                scalars.push(text);
                            }
                        }
                    }
                }
                if !scalars.is_empty() {
                    if allowed.contains(flat_key.as_str()) {
                        out.insert(flat_key, render_stringified_list(&scalars));
                    } else {
                        debug!(key = flat_key.as_str(), "list key not in allowlist");
                        *dropped += 1;
                    }
                }
            }
            scalar => {
                if !allowed.contains(flat_key.as_str()) {
                    debug!(key = flat_key.as_str(), "key not in allowlist");
                    *dropped += 1;
                } else if let Some(text) = scalar_text(scalar) {
                    out.insert(flat_key, text);
                }
            }
        }
    }
}

/// The `value` of a metadata entry, or the entry itself when it is a bare
/// scalar.
fn metadata_value(entry: &Value) -> Option<String> {
    match entry {
        Value::Object(fields) => fields.get("value").and_then(scalar_text),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}
