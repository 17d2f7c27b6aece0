//! Record-type registry: the declarative comparison tables.
//!
//! One [`RecordTypeConfig`] per audited entity. Each names the join key on
//! both sides, where the human label comes from, the identifier and
//! last-modified column pairs, and the ordered [`FieldSpec`] list. Field
//! order is report column order.

use crate::comparator::Comparator;
use crate::error::AuditError;
use crate::vocab::VocabularyId;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Source,
    Target,
}

impl Side {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Community,
    Collection,
    Bitstream,
    Item,
}

impl RecordType {
    pub const ALL: [RecordType; 4] = [
        RecordType::Community,
        RecordType::Collection,
        RecordType::Bitstream,
        RecordType::Item,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Community => "community",
            Self::Collection => "collection",
            Self::Bitstream => "bitstream",
            Self::Item => "item",
        }
    }

    const fn plural(self) -> &'static str {
        match self {
            Self::Community => "communities",
            Self::Collection => "collections",
            Self::Bitstream => "bitstreams",
            Self::Item => "items",
        }
    }

    /// Build the comparison table for this record type.
    pub fn config(self) -> RecordTypeConfig {
        match self {
            Self::Community => community(),
            Self::Collection => collection(),
            Self::Bitstream => bitstream(),
            Self::Item => item(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = AuditError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| wanted == kind.as_str() || wanted == kind.plural())
            .ok_or_else(|| AuditError::UnknownRecordType(raw.to_string()))
    }
}

/// An optional column on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ColumnPair {
    pub source: Option<&'static str>,
    pub target: Option<&'static str>,
}

impl ColumnPair {
    const fn both(source: &'static str, target: &'static str) -> Self {
        Self {
            source: Some(source),
            target: Some(target),
        }
    }

    pub fn get(&self, side: Side) -> Option<&'static str> {
        match side {
            Side::Source => self.source,
            Side::Target => self.target,
        }
    }
}

/// One audited field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub label: &'static str,
    pub source: Vec<String>,
    pub target: Vec<String>,
    pub comparator: Comparator,
}

impl FieldSpec {
    fn new(label: &'static str, source: &str, target: &str, comparator: Comparator) -> Self {
        Self::composite(label, &[source], target, comparator)
    }

    fn composite(
        label: &'static str,
        source: &[&str],
        target: &str,
        comparator: Comparator,
    ) -> Self {
        Self {
            label,
            source: source.iter().map(|c| (*c).to_string()).collect(),
            target: vec![target.to_string()],
            comparator,
        }
    }

    pub fn columns(&self, side: Side) -> &[String] {
        match side {
            Side::Source => &self.source,
            Side::Target => &self.target,
        }
    }
}

/// A complete comparison table for one record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordTypeConfig {
    pub record_type: RecordType,
    pub source_key: Vec<&'static str>,
    pub target_key: Vec<&'static str>,
    /// Label candidates; the first non-blank cell wins.
    pub label: Vec<(Side, &'static str)>,
    pub identifier: ColumnPair,
    pub last_modified: ColumnPair,
    pub fields: Vec<FieldSpec>,
}

impl RecordTypeConfig {
    pub fn key(&self, side: Side) -> &[&'static str] {
        match side {
            Side::Source => &self.source_key,
            Side::Target => &self.target_key,
        }
    }

    /// Check every field's column counts against its comparator.
    pub fn validate(&self) -> Result<(), AuditError> {
        if self.source_key.is_empty() || self.source_key.len() != self.target_key.len() {
            return Err(AuditError::SchemaShape {
                field: "<join key>".to_string(),
                comparator: "join",
                expected: "equal non-empty key arity".to_string(),
                source_columns: self.source_key.len(),
                target_columns: self.target_key.len(),
            });
        }
        for field in &self.fields {
            let shape = field.comparator.shape();
            if !shape.accepts(field.source.len(), field.target.len()) {
                return Err(AuditError::SchemaShape {
                    field: field.label.to_string(),
                    comparator: field.comparator.name(),
                    expected: shape.to_string(),
                    source_columns: field.source.len(),
                    target_columns: field.target.len(),
                });
            }
        }
        Ok(())
    }

    /// Columns a dataset on `side` must carry: the join key, plus every
    /// column a field compares. Label, identifier and last-modified columns
    /// are optional and read as missing when absent.
    pub fn required_columns(&self, side: Side) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        let fields = self
            .fields
            .iter()
            .flat_map(|f| f.columns(side).iter().map(String::as_str));
        for column in self.key(side).iter().copied().chain(fields) {
            if !out.contains(&column) {
                out.push(column);
            }
        }
        out
    }
}

fn community() -> RecordTypeConfig {
    RecordTypeConfig {
        record_type: RecordType::Community,
        source_key: vec!["title"],
        target_key: vec!["name"],
        label: vec![(Side::Source, "title"), (Side::Target, "name")],
        identifier: ColumnPair::both("id", "uuid"),
        last_modified: ColumnPair::both("updated_at", "lastModified"),
        fields: vec![
            FieldSpec::new("name", "title", "name", Comparator::Exact),
            FieldSpec::new(
                "description",
                "description",
                "metadata.dc.description",
                Comparator::ValueInList,
            ),
            FieldSpec::new(
                "abstract",
                "abstract",
                "metadata.dc.description.abstract",
                Comparator::ValueInList,
            ),
            FieldSpec::new(
                "dc.title",
                "title",
                "metadata.dc.title",
                Comparator::ValueInList,
            ),
        ],
    }
}

fn collection() -> RecordTypeConfig {
    RecordTypeConfig {
        record_type: RecordType::Collection,
        source_key: vec!["id"],
        target_key: vec!["provenance.ual.jupiterId.collection"],
        label: vec![(Side::Source, "title"), (Side::Target, "name")],
        identifier: ColumnPair::both("id", "uuid"),
        last_modified: ColumnPair::both("updated_at", "lastModified"),
        fields: vec![
            FieldSpec::new("name", "title", "name", Comparator::Exact),
            FieldSpec::new(
                "description",
                "description",
                "metadata.dc.description",
                Comparator::ValueInList,
            ),
            FieldSpec::new(
                "abstract",
                "abstract",
                "metadata.dc.description.abstract",
                Comparator::ValueInList,
            ),
            FieldSpec::new(
                "dc.title",
                "title",
                "metadata.dc.title",
                Comparator::ValueInList,
            ),
            FieldSpec::new(
                "community",
                "community.title",
                "provenance.ual.jupiterId.community",
                Comparator::Exact,
            ),
        ],
    }
}

fn bitstream() -> RecordTypeConfig {
    RecordTypeConfig {
        record_type: RecordType::Bitstream,
        source_key: vec!["provenance.ual.jupiterId.item", "bitstream.sequenceId"],
        target_key: vec!["provenance.ual.jupiterId.item", "bitstream.sequenceId"],
        label: vec![(Side::Source, "item.title"), (Side::Target, "item.name")],
        identifier: ColumnPair::both("item.id", "bitstream.uuid"),
        last_modified: ColumnPair {
            source: Some("created_at"),
            target: None,
        },
        fields: vec![
            FieldSpec::new(
                "filename",
                "filename",
                "bitstream.name",
                Comparator::FilenameWithSuffix,
            ),
            FieldSpec::new(
                "checksum",
                "checksum",
                "bitstream.checksum.value",
                Comparator::Checksum,
            ),
            FieldSpec::new("size", "byte_size", "bitstream.sizeBytes", Comparator::Exact),
            FieldSpec::new(
                "item.title",
                "item.title",
                "item.name",
                Comparator::IgnoreWhitespace,
            ),
        ],
    }
}

fn item() -> RecordTypeConfig {
    use Comparator::*;
    let m = |label: &'static str, source: &str, comparator: Comparator| {
        FieldSpec::composite(label, &[source], &format!("metadata.{label}"), comparator)
    };
    let m2 = |label: &'static str, first: &str, second: &str, comparator: Comparator| {
        FieldSpec::composite(
            label,
            &[first, second],
            &format!("metadata.{label}"),
            comparator,
        )
    };
    RecordTypeConfig {
        record_type: RecordType::Item,
        source_key: vec!["id"],
        target_key: vec!["metadata.ual.jupiterId"],
        label: vec![(Side::Source, "title"), (Side::Target, "name")],
        identifier: ColumnPair::both("id", "uuid"),
        last_modified: ColumnPair::both("updated_at", "lastModified"),
        fields: vec![
            FieldSpec::new("name", "title", "name", Exact),
            m("dc.title", "title", ValueInList),
            m("dc.title.alternative", "alternative_title", ValueInList),
            m2("dc.contributor.author", "creators", "dissertant", OneOfLists),
            m2(
                "dc.contributor.other",
                "contributors",
                "committee_members",
                ConcatenatedLists,
            ),
            m("dc.contributor.advisor", "supervisors", ListEqTrimmed),
            m("dc.description", "description", ValueInList),
            m("dc.description.abstract", "abstract", ValueInList),
            m("dc.subject", "subject", ListEq),
            m("dc.coverage.temporal", "temporal_subjects", ListEq),
            m("dc.coverage.spatial", "spatial_subjects", ListEq),
            m2(
                "dc.language.iso",
                "languages",
                "language",
                VocabularyList(VocabularyId::Language),
            ),
            m2("dc.date.issued", "created", "graduation_date", AnyInList),
            m("dc.rights", "rights", ValueInList),
            m("dc.rights.license", "license", ValueInList),
            m2("dc.type", "item_type", "publication_status", ResourceType),
            FieldSpec::new(
                "collection",
                "member_of_paths",
                "provenance.ual.jupiterId.collection",
                CollectionPaths,
            ),
            FieldSpec::new("access_rights", "visibility", "access_rights", AccessRights),
            m("dc.identifier.doi", "doi", DoiInList),
            m("ual.fedora3UUID", "fedora3_uuid", ValueInList),
            m("ual.fedora3Handle", "fedora3_handle", ValueInList),
            m("ual.hydraNoid", "hydra_noid", ValueInList),
            m2(
                "ual.ingestBatch",
                "ingest_batch",
                "batch_ingest_id",
                ConcatenatedLists,
            ),
            m("dc.relation.isversionof", "is_version_of", ListEqTrimmed),
            m("dcterms.source", "source", ValueInList),
            m("dc.relation", "related_link", ValueInList),
            m("thesis.degree.level", "thesis_level", ValueInList),
            m("thesis.degree.name", "degree", ValueInList),
            m("thesis.degree.discipline", "specialization", ValueInList),
            m("thesis.degree.grantor", "institution", ValueInList),
            m("ual.department", "departments", UnorderedList),
        ],
    }
}
