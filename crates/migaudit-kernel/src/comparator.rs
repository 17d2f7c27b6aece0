//! Field comparators.
//!
//! Each [`Comparator`] variant is one named equivalence rule between the
//! source and target renderings of a field. The alignment engine resolves
//! the raw columns; a comparator only ever sees the resolved cells, so every
//! rule is a pure function of `(source cells, target cells, vocabularies)`.
//!
//! Missing-value policy is per comparator and is part of its contract. The
//! `both_empty_passes` flag records it so reports and tests can check it.

use crate::cell::{Cell, MISSING};
use crate::error::CompareError;
use crate::normalize::{
    cell_as_list, parse_nested_path_list, parse_stringified_list, strip_whitespace_collapse,
    trim_all,
};
use crate::verdict::{InfoVerdict, Verdict};
use crate::vocab::{DEFAULT_THESIS_TYPE, Vocabularies, VocabularyId};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, trace, warn};

/// Column counts a comparator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub source_min: usize,
    pub source_max: usize,
    pub target: usize,
}

impl Shape {
    const fn scalar() -> Self {
        Self {
            source_min: 1,
            source_max: 1,
            target: 1,
        }
    }

    const fn sources(min: usize, max: usize) -> Self {
        Self {
            source_min: min,
            source_max: max,
            target: 1,
        }
    }

    pub fn accepts(&self, source_columns: usize, target_columns: usize) -> bool {
        (self.source_min..=self.source_max).contains(&source_columns)
            && target_columns == self.target
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source_min == self.source_max {
            write!(f, "{} source", self.source_min)?;
        } else {
            write!(f, "{}..={} source", self.source_min, self.source_max)?;
        }
        write!(f, " and {} target column(s)", self.target)
    }
}

/// The catalogue of comparison rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// Byte-for-byte equal text. Missing matches nothing, not even missing.
    Exact,
    /// Equal after removing all whitespace. Missing on either side fails.
    IgnoreWhitespace,
    /// Trimmed source scalar is an element of the target list.
    ValueInList,
    /// Both stringified lists equal element-wise, in order.
    ListEq,
    /// As [`Comparator::ListEq`] with each element trimmed.
    ListEqTrimmed,
    /// Trimmed lists equal as multisets. Order-insensitive.
    UnorderedList,
    /// Source URIs (from one or two columns) mapped through a vocabulary
    /// equal the target list as multisets. Unmapped URIs are a hard error.
    VocabularyList(VocabularyId),
    /// Any value of either source column appears in the target list.
    AnyInList,
    /// Both source lists concatenated equal the target list.
    ConcatenatedLists,
    /// The target list equals the list of one of the two source columns.
    OneOfLists,
    /// Parent ids of the source path list equal the target id list,
    /// order-insensitive.
    CollectionPaths,
    /// Base64 source digest decodes to the target's hex digest.
    Checksum,
    /// Target filename is the source filename, or it with a `_suffix`
    /// inserted before the extension.
    FilenameWithSuffix,
    /// Source visibility URI maps to the target access status. Unmapped
    /// URIs fail.
    AccessRights,
    /// Source type plus optional status map to the target type list.
    /// Unmapped URIs fail.
    ResourceType,
    /// Source `doi:` identifier, rewritten as a resolver URL, is an element
    /// of the target list.
    DoiInList,
}

impl Serialize for Comparator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Comparator {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::IgnoreWhitespace => "ignore-whitespace",
            Self::ValueInList => "value-in-list",
            Self::ListEq => "list-eq",
            Self::ListEqTrimmed => "list-eq-trimmed",
            Self::UnorderedList => "unordered-list",
            Self::VocabularyList(VocabularyId::Language) => "language-vocabulary",
            Self::VocabularyList(VocabularyId::ResourceType) => "resource-type-vocabulary",
            Self::VocabularyList(VocabularyId::AccessRights) => "access-rights-vocabulary",
            Self::AnyInList => "any-in-list",
            Self::ConcatenatedLists => "concatenated-lists",
            Self::OneOfLists => "one-of-lists",
            Self::CollectionPaths => "collection-paths",
            Self::Checksum => "checksum",
            Self::FilenameWithSuffix => "filename-with-suffix",
            Self::AccessRights => "access-rights",
            Self::ResourceType => "resource-type",
            Self::DoiInList => "doi-in-list",
        }
    }

    pub const fn shape(self) -> Shape {
        match self {
            Self::VocabularyList(_) => Shape::sources(1, 2),
            Self::AnyInList | Self::ConcatenatedLists | Self::OneOfLists => Shape::sources(2, 2),
            Self::ResourceType => Shape::sources(1, 2),
            _ => Shape::scalar(),
        }
    }

    /// Whether blank-versus-blank is a `PASS`.
    pub const fn both_empty_passes(self) -> bool {
        !matches!(
            self,
            Self::Exact
                | Self::IgnoreWhitespace
                | Self::Checksum
                | Self::FilenameWithSuffix
                | Self::AccessRights
        )
    }

    /// Compare resolved cells. `source` and `target` hold one cell per
    /// declared column, in declaration order.
    pub fn compare(
        self,
        source: &[&Cell],
        target: &[&Cell],
        vocab: &Vocabularies,
    ) -> Result<Verdict, CompareError> {
        let tgt = nth(target, 0);
        let verdict = match self {
            Self::Exact => exact(nth(source, 0), tgt),
            Self::IgnoreWhitespace => ignore_whitespace(nth(source, 0), tgt),
            Self::ValueInList => value_in_list(nth(source, 0), tgt),
            Self::ListEq => list_eq(nth(source, 0), tgt, false),
            Self::ListEqTrimmed => list_eq(nth(source, 0), tgt, true),
            Self::UnorderedList => unordered_list(nth(source, 0), tgt),
            Self::VocabularyList(id) => return vocabulary_list(source, tgt, vocab, id),
            Self::AnyInList => any_in_list(source, tgt),
            Self::ConcatenatedLists => concatenated_lists(source, tgt),
            Self::OneOfLists => one_of_lists(source, tgt),
            Self::CollectionPaths => collection_paths(nth(source, 0), tgt),
            Self::Checksum => checksum(nth(source, 0), tgt),
            Self::FilenameWithSuffix => filename_with_suffix(nth(source, 0), tgt),
            Self::AccessRights => access_rights(nth(source, 0), tgt, vocab),
            Self::ResourceType => resource_type(source, tgt, vocab),
            Self::DoiInList => doi_in_list(nth(source, 0), tgt),
        };
        trace!(comparator = self.name(), %verdict, "compared field");
        Ok(verdict)
    }
}

fn nth<'a>(cells: &[&'a Cell], index: usize) -> &'a Cell {
    cells.get(index).copied().unwrap_or(&MISSING)
}

fn exact(source: &Cell, target: &Cell) -> Verdict {
    match (source, target) {
        (Cell::Text(a), Cell::Text(b)) => Verdict::from_bool(a == b),
        _ => Verdict::Fail,
    }
}

fn ignore_whitespace(source: &Cell, target: &Cell) -> Verdict {
    match (source, target) {
        (Cell::Text(a), Cell::Text(b)) => {
            Verdict::from_bool(strip_whitespace_collapse(a) == strip_whitespace_collapse(b))
        }
        _ => Verdict::Fail,
    }
}

fn value_in_list(source: &Cell, target: &Cell) -> Verdict {
    let Some(list) = parse_stringified_list(target) else {
        return Verdict::Fail;
    };
    scalar_in_list(source.as_text().map(str::trim).unwrap_or(""), &list)
}

fn scalar_in_list(value: &str, list: &[String]) -> Verdict {
    if value.is_empty() {
        return Verdict::from_bool(list.is_empty());
    }
    Verdict::from_bool(list.iter().any(|item| item.trim() == value))
}

fn list_eq(source: &Cell, target: &Cell, trim: bool) -> Verdict {
    let (Some(a), Some(b)) = (parse_stringified_list(source), parse_stringified_list(target))
    else {
        return Verdict::Fail;
    };
    if trim {
        Verdict::from_bool(trim_all(a) == trim_all(b))
    } else {
        Verdict::from_bool(a == b)
    }
}

fn unordered_list(source: &Cell, target: &Cell) -> Verdict {
    let (Some(a), Some(b)) = (parse_stringified_list(source), parse_stringified_list(target))
    else {
        return Verdict::Fail;
    };
    Verdict::from_bool(sorted(trim_all(a)) == sorted(trim_all(b)))
}

fn sorted(mut items: Vec<String>) -> Vec<String> {
    items.sort();
    items
}

/// Every listed value across the source columns, or `None` if any column
/// is malformed.
fn source_values(source: &[&Cell]) -> Option<Vec<String>> {
    let mut values = Vec::new();
    for cell in source {
        values.extend(trim_all(cell_as_list(cell)?));
    }
    Some(values)
}

fn vocabulary_list(
    source: &[&Cell],
    target: &Cell,
    vocab: &Vocabularies,
    id: VocabularyId,
) -> Result<Verdict, CompareError> {
    let (Some(terms), Some(expected)) = (source_values(source), parse_stringified_list(target))
    else {
        return Ok(Verdict::Fail);
    };
    let table = vocab.get(id);
    let mut mapped = Vec::with_capacity(terms.len());
    for term in terms {
        let code = table.lookup(&term).ok_or_else(|| CompareError::UnmappedTerm {
            vocabulary: table.id(),
            term: term.clone(),
        })?;
        mapped.push(code.to_string());
    }
    debug!(vocabulary = %id, mapped = ?mapped, "mapped source terms");
    Ok(Verdict::from_bool(sorted(mapped) == sorted(trim_all(expected))))
}

fn any_in_list(source: &[&Cell], target: &Cell) -> Verdict {
    let (Some(values), Some(list)) = (source_values(source), parse_stringified_list(target))
    else {
        return Verdict::Fail;
    };
    if values.is_empty() {
        return Verdict::from_bool(list.is_empty());
    }
    let list = trim_all(list);
    Verdict::from_bool(values.iter().any(|value| list.contains(value)))
}

fn concatenated_lists(source: &[&Cell], target: &Cell) -> Verdict {
    let (Some(values), Some(list)) = (source_values(source), parse_stringified_list(target))
    else {
        return Verdict::Fail;
    };
    Verdict::from_bool(values == trim_all(list))
}

fn one_of_lists(source: &[&Cell], target: &Cell) -> Verdict {
    let Some(list) = parse_stringified_list(target) else {
        return Verdict::Fail;
    };
    let list = trim_all(list);
    let mut candidates = Vec::new();
    for cell in source {
        match cell_as_list(cell) {
            Some(values) if !values.is_empty() => candidates.push(trim_all(values)),
            Some(_) => {}
            None => return Verdict::Fail,
        }
    }
    if candidates.is_empty() {
        return Verdict::from_bool(list.is_empty());
    }
    Verdict::from_bool(candidates.iter().any(|candidate| *candidate == list))
}

fn collection_paths(source: &Cell, target: &Cell) -> Verdict {
    let Some(ids) = parse_stringified_list(target) else {
        return Verdict::Fail;
    };
    let parents = parse_nested_path_list(source);
    Verdict::from_bool(sorted(parents) == sorted(trim_all(ids)))
}

fn checksum(source: &Cell, target: &Cell) -> Verdict {
    let (Some(encoded), Some(digest)) = (source.as_text(), target.as_text()) else {
        return Verdict::Fail;
    };
    match STANDARD.decode(encoded.trim()) {
        Ok(bytes) => Verdict::from_bool(hex::encode(bytes).eq_ignore_ascii_case(digest.trim())),
        Err(error) => {
            warn!(input = encoded, %error, "source checksum is not valid base64");
            Verdict::Fail
        }
    }
}

fn filename_with_suffix(source: &Cell, target: &Cell) -> Verdict {
    let (Some(original), Some(migrated)) = (source.as_text(), target.as_text()) else {
        return Verdict::Fail;
    };
    if original == migrated {
        return Verdict::Pass;
    }
    let (stem, extension) = match original.rfind('.') {
        Some(dot) if dot > 0 => original.split_at(dot),
        _ => (original, ""),
    };
    let matched = migrated
        .strip_prefix(stem)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix(extension))
        .is_some_and(|suffix| !suffix.is_empty() && !suffix.contains(['/', '\\']));
    Verdict::from_bool(matched)
}

fn access_rights(source: &Cell, target: &Cell, vocab: &Vocabularies) -> Verdict {
    let (Some(uri), Some(status)) = (source.as_text(), target.as_text()) else {
        return Verdict::Fail;
    };
    match vocab.get(VocabularyId::AccessRights).lookup(uri.trim()) {
        Some(expected) => Verdict::from_bool(expected == status.trim()),
        None => {
            debug!(term = uri, "visibility has no access-status mapping");
            Verdict::Fail
        }
    }
}

fn resource_type(source: &[&Cell], target: &Cell, vocab: &Vocabularies) -> Verdict {
    let (Some(terms), Some(raw_target)) = (source_values(source), cell_as_list(target)) else {
        return Verdict::Fail;
    };
    let target_types: Vec<String> = raw_target
        .iter()
        .flat_map(|value| value.split_whitespace())
        .map(str::to_string)
        .collect();

    if terms.is_empty() {
        if target_types.len() == 1 && target_types[0] == DEFAULT_THESIS_TYPE {
            return Verdict::Info(InfoVerdict::MigrationDefault);
        }
        return Verdict::from_bool(target_types.is_empty());
    }

    let table = vocab.get(VocabularyId::ResourceType);
    let mut mapped = Vec::with_capacity(terms.len());
    for term in &terms {
        match table.lookup(term) {
            Some(code) => mapped.push(code.to_string()),
            None => {
                debug!(term = term.as_str(), "type has no resource-type mapping");
                return Verdict::Fail;
            }
        }
    }
    Verdict::from_bool(mapped == target_types)
}

fn doi_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^doi:\s*").expect("doi prefix regex must compile"))
}

/// Rewrite `doi:10.x/y` as `https://doi.org/10.x/y`, leaving other text alone.
pub fn doi_to_url(value: &str) -> String {
    let trimmed = value.trim();
    let re = doi_prefix_re();
    if re.is_match(trimmed) {
        format!("https://doi.org/{}", re.replace(trimmed, ""))
    } else {
        trimmed.to_string()
    }
}

fn doi_in_list(source: &Cell, target: &Cell) -> Verdict {
    let Some(list) = parse_stringified_list(target) else {
        return Verdict::Fail;
    };
    let value = source.as_text().map(doi_to_url).unwrap_or_default();
    scalar_in_list(&value, &list)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(comparator: Comparator, source: &[Cell], target: &Cell) -> Verdict {
        let source: Vec<&Cell> = source.iter().collect();
        comparator
            .compare(&source, &[target], &Vocabularies::standard())
            .expect("comparison should not fail hard")
    }

    fn t(value: &str) -> Cell {
        Cell::text(value)
    }

    const ALL: &[Comparator] = &[
        Comparator::Exact,
        Comparator::IgnoreWhitespace,
        Comparator::ValueInList,
        Comparator::ListEq,
        Comparator::ListEqTrimmed,
        Comparator::UnorderedList,
        Comparator::VocabularyList(VocabularyId::Language),
        Comparator::AnyInList,
        Comparator::ConcatenatedLists,
        Comparator::OneOfLists,
        Comparator::CollectionPaths,
        Comparator::Checksum,
        Comparator::FilenameWithSuffix,
        Comparator::AccessRights,
        Comparator::ResourceType,
        Comparator::DoiInList,
    ];

    #[test]
    fn missing_versus_missing_follows_documented_policy() {
        for comparator in ALL {
            let sources = vec![Cell::Missing; comparator.shape().source_max];
            let verdict = run(*comparator, &sources, &Cell::Missing);
            let expected = Verdict::from_bool(comparator.both_empty_passes());
            assert_eq!(verdict, expected, "comparator {comparator}");
        }
    }

    #[test]
    fn missing_source_fails_against_a_present_target() {
        for comparator in ALL {
            let sources = vec![Cell::Missing; comparator.shape().source_max];
            let target = match comparator {
                Comparator::Exact
                | Comparator::IgnoreWhitespace
                | Comparator::Checksum
                | Comparator::FilenameWithSuffix
                | Comparator::AccessRights => t("value"),
                _ => t("['en']"),
            };
            assert_eq!(
                run(*comparator, &sources, &target),
                Verdict::Fail,
                "comparator {comparator}"
            );
        }
    }

    #[test]
    fn exact_is_byte_for_byte() {
        assert_eq!(run(Comparator::Exact, &[t("a")], &t("a")), Verdict::Pass);
        assert_eq!(run(Comparator::Exact, &[t("a")], &t("a\n")), Verdict::Fail);
        assert_eq!(run(Comparator::Exact, &[t("a")], &t(" a")), Verdict::Fail);
        assert_eq!(run(Comparator::Exact, &[t("a")], &t("A")), Verdict::Fail);
        assert_eq!(run(Comparator::Exact, &[t("")], &Cell::Missing), Verdict::Fail);
        assert_eq!(run(Comparator::Exact, &[t("")], &t("")), Verdict::Pass);
    }

    #[test]
    fn ignore_whitespace_is_case_sensitive() {
        let c = Comparator::IgnoreWhitespace;
        assert_eq!(run(c, &[t("a")], &t("a")), Verdict::Pass);
        assert_eq!(run(c, &[t("a")], &t("a\n")), Verdict::Pass);
        assert_eq!(run(c, &[t("a")], &t("a ")), Verdict::Pass);
        assert_eq!(run(c, &[t("a")], &t(" a ")), Verdict::Pass);
        assert_eq!(run(c, &[t("a")], &t(" a\n")), Verdict::Pass);
        assert_eq!(run(c, &[t("a")], &t("b")), Verdict::Fail);
        assert_eq!(run(c, &[t("a")], &t("A")), Verdict::Fail);
        assert_eq!(run(c, &[Cell::Missing], &t("")), Verdict::Fail);
    }

    #[test]
    fn value_in_list_trims_and_tolerates_both_empty() {
        let c = Comparator::ValueInList;
        assert_eq!(run(c, &[t(" T ")], &t("['x', ' T']")), Verdict::Pass);
        assert_eq!(run(c, &[t("T")], &t("['x']")), Verdict::Fail);
        assert_eq!(run(c, &[t("")], &t("[]")), Verdict::Pass);
        assert_eq!(run(c, &[t("T")], &t("not a list")), Verdict::Fail);
    }

    #[test]
    fn plain_list_equality_is_order_sensitive() {
        assert_eq!(
            run(Comparator::ListEq, &[t("['a', 'b']")], &t("['a', 'b']")),
            Verdict::Pass
        );
        assert_eq!(
            run(Comparator::ListEq, &[t("['a', 'b']")], &t("['b', 'a']")),
            Verdict::Fail
        );
        assert_eq!(
            run(Comparator::ListEq, &[t("['a ']")], &t("['a']")),
            Verdict::Fail
        );
        assert_eq!(
            run(Comparator::ListEqTrimmed, &[t("['a ']")], &t("[' a']")),
            Verdict::Pass
        );
        assert_eq!(
            run(Comparator::ListEqTrimmed, &[t("['a', 'b']")], &t("['b', 'a']")),
            Verdict::Fail
        );
    }

    #[test]
    fn unordered_list_ignores_order_but_counts_duplicates() {
        let c = Comparator::UnorderedList;
        assert_eq!(run(c, &[t("['a', 'b ']")], &t("['b', 'a']")), Verdict::Pass);
        assert_eq!(run(c, &[t("['a', 'a']")], &t("['a']")), Verdict::Fail);
    }

    #[test]
    fn language_vocabulary_maps_uris_as_multiset() {
        let c = Comparator::VocabularyList(VocabularyId::Language);
        let source = t(
            r#"["http://id.loc.gov/vocabulary/iso639-2/fre", "http://id.loc.gov/vocabulary/iso639-2/eng"]"#,
        );
        assert_eq!(run(c, &[source.clone()], &t("['en', 'fr']")), Verdict::Pass);
        assert_eq!(run(c, &[source], &t("['en']")), Verdict::Fail);
        assert_eq!(
            run(
                c,
                &[Cell::Missing, t("http://id.loc.gov/vocabulary/iso639-2/zxx")],
                &t("['No linguistic content']")
            ),
            Verdict::Pass
        );
    }

    #[test]
    fn language_vocabulary_miss_is_a_hard_error() {
        let c = Comparator::VocabularyList(VocabularyId::Language);
        let source = t("['http://id.loc.gov/vocabulary/iso639-2/xxx']");
        let err = c
            .compare(&[&source], &[&t("['xx']")], &Vocabularies::standard())
            .expect_err("unmapped URI must propagate");
        assert_eq!(
            err,
            CompareError::UnmappedTerm {
                vocabulary: VocabularyId::Language,
                term: "http://id.loc.gov/vocabulary/iso639-2/xxx".to_string(),
            }
        );
    }

    #[test]
    fn composite_any_in_list_reads_either_column() {
        let c = Comparator::AnyInList;
        assert_eq!(
            run(c, &[t("2011"), Cell::Missing], &t("['2011']")),
            Verdict::Pass
        );
        assert_eq!(
            run(c, &[Cell::Missing, t("2011-06")], &t("['2011-06']")),
            Verdict::Pass
        );
        assert_eq!(
            run(c, &[Cell::Missing, t("2011-06")], &t("['2012']")),
            Verdict::Fail
        );
    }

    #[test]
    fn composite_concatenation_preserves_order() {
        let c = Comparator::ConcatenatedLists;
        assert_eq!(
            run(c, &[t("['b1']"), t("42")], &t("['b1', '42']")),
            Verdict::Pass
        );
        assert_eq!(
            run(c, &[t("['b1']"), t("42")], &t("['42', 'b1']")),
            Verdict::Fail
        );
    }

    #[test]
    fn composite_one_of_lists_ignores_blank_candidates() {
        let c = Comparator::OneOfLists;
        assert_eq!(
            run(c, &[t("['A', 'B']"), Cell::Missing], &t("['A', 'B']")),
            Verdict::Pass
        );
        assert_eq!(
            run(c, &[Cell::Missing, t("Dissertant")], &t("['Dissertant']")),
            Verdict::Pass
        );
        assert_eq!(
            run(c, &[Cell::Missing, t("Dissertant")], &t("[]")),
            Verdict::Fail
        );
    }

    #[test]
    fn collection_paths_compare_parent_ids_unordered() {
        let c = Comparator::CollectionPaths;
        assert_eq!(
            run(c, &[t(r#"["c/x", "c/y"]"#)], &t("['y', 'x']")),
            Verdict::Pass
        );
        assert_eq!(run(c, &[t(r#"["c/x"]"#)], &t("['y']")), Verdict::Fail);
    }

    #[test]
    fn checksum_decodes_base64_to_hex() {
        let c = Comparator::Checksum;
        let digest = t("8e82dffa09e62a70efe3f6525108c3f6");
        assert_eq!(run(c, &[t("joLf+gnmKnDv4/ZSUQjD9g==")], &digest), Verdict::Pass);
        assert_eq!(
            run(c, &[t("joLf+gnmKnDv4/ZSUQjD9g==")], &t("8E82DFFA09E62A70EFE3F6525108C3F6")),
            Verdict::Pass
        );
        assert_eq!(run(c, &[Cell::Missing], &digest), Verdict::Fail);
        assert_eq!(run(c, &[t("!!not base64")], &digest), Verdict::Fail);
    }

    #[test]
    fn filename_tolerates_generated_suffix() {
        let c = Comparator::FilenameWithSuffix;
        assert_eq!(run(c, &[t("a.pdf")], &t("a.pdf")), Verdict::Pass);
        assert_eq!(run(c, &[t("a.pdf")], &t("a_9f3c.pdf")), Verdict::Pass);
        assert_eq!(run(c, &[t("a.pdf")], &t("b.pdf")), Verdict::Fail);
        assert_eq!(run(c, &[Cell::Missing], &t("a_uuid.pdf")), Verdict::Fail);
        assert_eq!(run(c, &[t("a.pdf")], &t("a_.pdf")), Verdict::Fail);
        assert_eq!(run(c, &[t("a.pdf")], &t("a_x.txt")), Verdict::Fail);
        assert_eq!(run(c, &[t("README")], &t("README_1")), Verdict::Pass);
    }

    #[test]
    fn access_rights_maps_the_closed_table() {
        let c = Comparator::AccessRights;
        assert_eq!(
            run(c, &[t("http://terms.library.ualberta.ca/public")], &t("open.access")),
            Verdict::Pass
        );
        assert_eq!(
            run(c, &[t("http://terms.library.ualberta.ca/embargo")], &t("open.access")),
            Verdict::Fail
        );
        assert_eq!(
            run(c, &[t("http://terms.library.ualberta.ca/private")], &t("restricted")),
            Verdict::Fail
        );
    }

    #[test]
    fn resource_type_maps_type_and_status() {
        let c = Comparator::ResourceType;
        let article = t("http://purl.org/ontology/bibo/Article");
        let published = t("['http://purl.org/ontology/bibo/status#published']");
        let target = t(
            "['http://purl.org/coar/resource_type/c_6501 http://purl.org/coar/version/c_970fb48d4fbd8a85']",
        );
        assert_eq!(run(c, &[article.clone(), published], &target), Verdict::Pass);
        assert_eq!(
            run(
                c,
                &[article, Cell::Missing],
                &t("http://purl.org/coar/resource_type/c_6501")
            ),
            Verdict::Pass
        );
        assert_eq!(
            run(c, &[t("http://example.org/unknown"), Cell::Missing], &target),
            Verdict::Fail
        );
    }

    #[test]
    fn resource_type_flags_injected_thesis_default() {
        let c = Comparator::ResourceType;
        assert_eq!(
            run(c, &[Cell::Missing, Cell::Missing], &t(DEFAULT_THESIS_TYPE)),
            Verdict::Info(InfoVerdict::MigrationDefault)
        );
        assert_eq!(
            run(
                c,
                &[Cell::Missing, Cell::Missing],
                &t("['http://purl.org/coar/resource_type/c_6501']")
            ),
            Verdict::Fail
        );
    }

    #[test]
    fn doi_prefix_is_rewritten() {
        assert_eq!(doi_to_url("doi:10.7939/r3"), "https://doi.org/10.7939/r3");
        assert_eq!(doi_to_url("https://doi.org/10.1"), "https://doi.org/10.1");
        assert_eq!(
            run(
                Comparator::DoiInList,
                &[t("doi:10.7939/r3")],
                &t("['https://doi.org/10.7939/r3']")
            ),
            Verdict::Pass
        );
    }

    #[test]
    fn shapes_describe_column_counts() {
        assert!(Comparator::Exact.shape().accepts(1, 1));
        assert!(!Comparator::Exact.shape().accepts(2, 1));
        assert!(Comparator::ResourceType.shape().accepts(2, 1));
        assert!(!Comparator::OneOfLists.shape().accepts(1, 1));
        assert_eq!(
            Comparator::VocabularyList(VocabularyId::Language)
                .shape()
                .to_string(),
            "1..=2 source and 1 target column(s)"
        );
    }
}
