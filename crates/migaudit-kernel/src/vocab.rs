//! Controlled vocabularies shared by the two systems.
//!
//! The tables are immutable once built. Callers construct one
//! [`Vocabularies`] at start-up, optionally extend it from configuration, and
//! pass it by reference into every comparison.

use crate::error::AuditError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Type URI the migration writes for every thesis, which has no source type.
pub const DEFAULT_THESIS_TYPE: &str = "http://purl.org/coar/resource_type/c_46ec";

const LANGUAGE_TERMS: &[(&str, &str)] = &[
    ("http://id.loc.gov/vocabulary/iso639-2/eng", "en"),
    ("http://id.loc.gov/vocabulary/iso639-2/fre", "fr"),
    ("http://id.loc.gov/vocabulary/iso639-2/ger", "de"),
    ("http://id.loc.gov/vocabulary/iso639-2/ita", "it"),
    ("http://id.loc.gov/vocabulary/iso639-2/jpn", "ja"),
    ("http://id.loc.gov/vocabulary/iso639-2/spa", "es"),
    ("http://id.loc.gov/vocabulary/iso639-2/zho", "zh"),
    ("http://id.loc.gov/vocabulary/iso639-2/ukr", "uk"),
    ("http://id.loc.gov/vocabulary/iso639-2/rus", "ru"),
    (
        "http://id.loc.gov/vocabulary/iso639-2/zxx",
        "No linguistic content",
    ),
    ("http://terms.library.ualberta.ca/other", "other"),
];

const RESOURCE_TYPE_TERMS: &[(&str, &str)] = &[
    (
        "http://purl.org/ontology/bibo/Article",
        "http://purl.org/coar/resource_type/c_6501",
    ),
    (
        "http://purl.org/ontology/bibo/status#draft",
        "http://purl.org/coar/version/c_b1a7d7d4d402bcce",
    ),
    (
        "http://vivoweb.org/ontology/core#submitted",
        "http://purl.org/coar/version/c_71e4c1898caa6e32",
    ),
    (
        "http://purl.org/ontology/bibo/status#published",
        "http://purl.org/coar/version/c_970fb48d4fbd8a85",
    ),
    (
        "http://purl.org/ontology/bibo/Book",
        "http://purl.org/coar/resource_type/c_2f33",
    ),
    (
        "http://purl.org/ontology/bibo/Chapter",
        "http://purl.org/coar/resource_type/c_3248",
    ),
    (
        "http://purl.org/ontology/bibo/Image",
        "http://purl.org/coar/resource_type/c_c513",
    ),
    (
        "http://purl.org/ontology/bibo/Report",
        "http://purl.org/coar/resource_type/c_93fc",
    ),
    (
        "http://terms.library.ualberta.ca/researchMaterial",
        "http://purl.org/coar/resource_type/c_1843",
    ),
    (
        "http://vivoweb.org/ontology/core#Presentation",
        "http://purl.org/coar/resource_type/R60J-J5BD",
    ),
    (
        "http://vivoweb.org/ontology/core#ConferencePoster",
        "http://purl.org/coar/resource_type/c_6670",
    ),
    (
        "http://vivoweb.org/ontology/core#Dataset",
        "http://purl.org/coar/resource_type/c_ddb1",
    ),
    (
        "http://vivoweb.org/ontology/core#Review",
        "http://purl.org/coar/resource_type/c_efa0",
    ),
    (
        "http://terms.library.ualberta.ca/learningObject",
        "http://purl.org/coar/resource_type/c_e059",
    ),
];

const ACCESS_RIGHTS_TERMS: &[(&str, &str)] = &[
    ("http://terms.library.ualberta.ca/public", "open.access"),
    ("http://terms.library.ualberta.ca/embargo", "embargo"),
    ("http://terms.library.ualberta.ca/authenticated", "restricted"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyId {
    /// ISO 639-2 URIs to two-letter codes.
    Language,
    /// Legacy item-type and publication-status URIs to COAR URIs.
    ResourceType,
    /// Legacy visibility URIs to the target's access-status enum. Closed.
    AccessRights,
}

impl VocabularyId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::ResourceType => "resource_type",
            Self::AccessRights => "access_rights",
        }
    }
}

impl fmt::Display for VocabularyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One source-term to target-term table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    id: VocabularyId,
    terms: BTreeMap<String, String>,
}

impl Vocabulary {
    fn from_pairs(id: VocabularyId, pairs: &[(&str, &str)]) -> Self {
        Self {
            id,
            terms: pairs
                .iter()
                .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
                .collect(),
        }
    }

    pub fn id(&self) -> VocabularyId {
        self.id
    }

    pub fn lookup(&self, term: &str) -> Option<&str> {
        self.terms.get(term).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Every vocabulary a comparator may consult.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabularies {
    language: Vocabulary,
    resource_type: Vocabulary,
    access_rights: Vocabulary,
}

impl Default for Vocabularies {
    fn default() -> Self {
        Self::standard()
    }
}

impl Vocabularies {
    /// The built-in tables used by the migration.
    pub fn standard() -> Self {
        Self {
            language: Vocabulary::from_pairs(VocabularyId::Language, LANGUAGE_TERMS),
            resource_type: Vocabulary::from_pairs(VocabularyId::ResourceType, RESOURCE_TYPE_TERMS),
            access_rights: Vocabulary::from_pairs(VocabularyId::AccessRights, ACCESS_RIGHTS_TERMS),
        }
    }

    pub fn get(&self, id: VocabularyId) -> &Vocabulary {
        match id {
            VocabularyId::Language => &self.language,
            VocabularyId::ResourceType => &self.resource_type,
            VocabularyId::AccessRights => &self.access_rights,
        }
    }

    /// Add entries to an extensible table. Built-in entries are never
    /// replaced; a conflicting extension is ignored with a warning.
    pub fn extend<I, K, V>(mut self, id: VocabularyId, entries: I) -> Result<Self, AuditError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = match id {
            VocabularyId::Language => &mut self.language,
            VocabularyId::ResourceType => &mut self.resource_type,
            VocabularyId::AccessRights => return Err(AuditError::FixedVocabulary(id)),
        };
        for (from, to) in entries {
            let from = from.into();
            let to = to.into();
            if let Some(existing) = table.terms.get(&from) {
                if *existing != to {
                    tracing::warn!(
                        vocabulary = %id,
                        term = from.as_str(),
                        existing = existing.as_str(),
                        rejected = to.as_str(),
                        "vocabulary extension conflicts with built-in term; keeping built-in"
                    );
                }
                continue;
            }
            table.terms.insert(from, to);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tables_cover_known_terms() {
        let vocab = Vocabularies::standard();
        let language = vocab.get(VocabularyId::Language);
        assert_eq!(
            language.lookup("http://id.loc.gov/vocabulary/iso639-2/eng"),
            Some("en")
        );
        assert_eq!(language.lookup("http://id.loc.gov/vocabulary/iso639-2/xxx"), None);
        assert_eq!(vocab.get(VocabularyId::AccessRights).len(), 3);
        assert_eq!(vocab.get(VocabularyId::ResourceType).len(), 14);
    }

    #[test]
    fn extension_adds_but_never_replaces() {
        let vocab = Vocabularies::standard()
            .extend(
                VocabularyId::Language,
                [
                    ("http://id.loc.gov/vocabulary/iso639-2/kor", "ko"),
                    ("http://id.loc.gov/vocabulary/iso639-2/eng", "english"),
                ],
            )
            .expect("language vocabulary is extensible");
        let language = vocab.get(VocabularyId::Language);
        assert_eq!(
            language.lookup("http://id.loc.gov/vocabulary/iso639-2/kor"),
            Some("ko")
        );
        assert_eq!(
            language.lookup("http://id.loc.gov/vocabulary/iso639-2/eng"),
            Some("en")
        );
    }

    #[test]
    fn access_rights_is_closed() {
        let err = Vocabularies::standard()
            .extend(
                VocabularyId::AccessRights,
                [("http://terms.library.ualberta.ca/private", "restricted")],
            )
            .expect_err("access rights must reject extension");
        assert!(matches!(
            err,
            AuditError::FixedVocabulary(VocabularyId::AccessRights)
        ));
    }
}
