//! Outer join of two datasets on their configured keys.
//!
//! Every key present on either side yields at least one [`AlignedRow`]. A
//! side absent for a key reads as [`Cell::Missing`] for every column, so
//! comparators see unmatched rows through the same path as matched ones.
//! Rows come out in ascending key order. A row whose key has a missing
//! component never joins; it follows the keyed rows as its own unmatched
//! row, source rows first, in input order.

use crate::cell::{Cell, MISSING};
use crate::dataset::{Dataset, Row};
use crate::schema::Side;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Suffix for a source column whose name also appears in the target.
pub const SOURCE_SUFFIX: &str = "_source";
/// Suffix for a target column whose name also appears in the source.
pub const TARGET_SUFFIX: &str = "_target";

/// A join key value, one cell per key column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(pub Vec<Cell>);

impl RowKey {
    fn of(row: &Row<'_>, columns: &[&str]) -> Self {
        Self(columns.iter().map(|column| row.get(column).clone()).collect())
    }

    /// False when any component is missing; such a key matches nothing.
    pub fn is_complete(&self) -> bool {
        !self.0.iter().any(Cell::is_missing)
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(cell.render())?;
        }
        Ok(())
    }
}

impl Serialize for RowKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    Matched,
    SourceOnly,
    TargetOnly,
}

/// One row of the joined result.
#[derive(Debug, Clone, Copy)]
pub struct AlignedRow<'a> {
    pub key: &'a RowKey,
    pub source: Option<Row<'a>>,
    pub target: Option<Row<'a>>,
}

impl<'a> AlignedRow<'a> {
    pub fn side(&self, side: Side) -> Option<Row<'a>> {
        match side {
            Side::Source => self.source,
            Side::Target => self.target,
        }
    }

    /// The cell under `column` on `side`; missing when that side is absent.
    pub fn cell(&self, side: Side, column: &str) -> &'a Cell {
        self.side(side).map_or(&MISSING, |row| row.get(column))
    }

    pub fn match_state(&self) -> MatchState {
        match (self.source.is_some(), self.target.is_some()) {
            (true, true) => MatchState::Matched,
            (true, false) => MatchState::SourceOnly,
            _ => MatchState::TargetOnly,
        }
    }

    /// The cell a merged column reads for this row.
    pub fn merged_cell(&self, column: &MergedColumn) -> &'a Cell {
        match column.side {
            Some(side) => self.cell(side, &column.column),
            None => {
                let source = self.cell(Side::Source, &column.column);
                if source.is_missing() {
                    self.cell(Side::Target, &column.column)
                } else {
                    source
                }
            }
        }
    }
}

/// Rows of both datasets grouped by key.
#[derive(Debug)]
pub struct Join<'a> {
    groups: Vec<(RowKey, Vec<Row<'a>>, Vec<Row<'a>>)>,
}

impl<'a> Join<'a> {
    /// Number of row groups: distinct complete keys plus one per row with an
    /// incomplete key.
    pub fn key_count(&self) -> usize {
        self.groups.len()
    }

    /// Joined rows in key order. A key duplicated on both sides yields every
    /// pairing.
    pub fn rows(&self) -> impl Iterator<Item = AlignedRow<'_>> {
        self.groups.iter().flat_map(|(key, source, target)| {
            let pairs: Vec<AlignedRow<'_>> = match (source.is_empty(), target.is_empty()) {
                (false, true) => source
                    .iter()
                    .map(|row| AlignedRow {
                        key,
                        source: Some(*row),
                        target: None,
                    })
                    .collect(),
                (true, false) => target
                    .iter()
                    .map(|row| AlignedRow {
                        key,
                        source: None,
                        target: Some(*row),
                    })
                    .collect(),
                _ => source
                    .iter()
                    .flat_map(|s| {
                        target.iter().map(move |t| AlignedRow {
                            key,
                            source: Some(*s),
                            target: Some(*t),
                        })
                    })
                    .collect(),
            };
            pairs
        })
    }
}

/// Full outer join of `source` and `target` on their key columns.
pub fn outer_join<'a>(
    source: &'a Dataset,
    source_key: &[&str],
    target: &'a Dataset,
    target_key: &[&str],
) -> Join<'a> {
    let mut keyed: BTreeMap<RowKey, (Vec<Row<'a>>, Vec<Row<'a>>)> = BTreeMap::new();
    let mut unkeyed = Vec::new();
    for (side, dataset, columns) in [
        (Side::Source, source, source_key),
        (Side::Target, target, target_key),
    ] {
        for row in dataset.rows() {
            let key = RowKey::of(&row, columns);
            if !key.is_complete() {
                warn!(
                    %side,
                    row = row.index(),
                    key = %key,
                    "join key has a missing component; row stays unmatched"
                );
                let group = match side {
                    Side::Source => (key, vec![row], Vec::new()),
                    Side::Target => (key, Vec::new(), vec![row]),
                };
                unkeyed.push(group);
                continue;
            }
            let entry = keyed.entry(key).or_default();
            match side {
                Side::Source => entry.0.push(row),
                Side::Target => entry.1.push(row),
            }
        }
    }
    for (key, (s, t)) in &keyed {
        if s.len() > 1 || t.len() > 1 {
            warn!(
                key = %key,
                source_rows = s.len(),
                target_rows = t.len(),
                "join key is not unique; pairing every combination"
            );
        }
    }
    debug!(
        source_rows = source.len(),
        target_rows = target.len(),
        keys = keyed.len(),
        unmatched_incomplete = unkeyed.len(),
        "outer join complete"
    );
    let groups = keyed
        .into_iter()
        .map(|(key, (s, t))| (key, s, t))
        .chain(unkeyed)
        .collect();
    Join { groups }
}

/// One column of the flattened join output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedColumn {
    /// Output header.
    pub name: String,
    /// Side the value is read from. `None` marks a join column both sides
    /// share by name; it reads from whichever side is present.
    pub side: Option<Side>,
    /// Column name in the side's dataset.
    pub column: String,
}

/// Column layout for writing a join: source columns then target columns.
/// Names present on both sides get [`SOURCE_SUFFIX`] / [`TARGET_SUFFIX`],
/// except key columns joined to themselves, which appear once.
pub fn merged_columns(
    source: &Dataset,
    source_key: &[&str],
    target: &Dataset,
    target_key: &[&str],
) -> Vec<MergedColumn> {
    let shared_key = |name: &str| {
        source_key
            .iter()
            .zip(target_key)
            .any(|(s, t)| *s == name && *t == name)
    };
    let mut out = Vec::with_capacity(source.headers().len() + target.headers().len());
    for name in source.headers() {
        if shared_key(name) {
            out.push(MergedColumn {
                name: name.clone(),
                side: None,
                column: name.clone(),
            });
        } else {
            let collides = target.has_column(name);
            out.push(MergedColumn {
                name: if collides {
                    format!("{name}{SOURCE_SUFFIX}")
                } else {
                    name.clone()
                },
                side: Some(Side::Source),
                column: name.clone(),
            });
        }
    }
    for name in target.headers() {
        if shared_key(name) && source.has_column(name) {
            continue;
        }
        let collides = source.has_column(name);
        out.push(MergedColumn {
            name: if collides {
                format!("{name}{TARGET_SUFFIX}")
            } else {
                name.clone()
            },
            side: Some(Side::Target),
            column: name.clone(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(headers: &[&str], rows: &[&[&str]]) -> Dataset {
        Dataset::from_rows(
            headers,
            rows.iter().map(|r| r.iter().map(|c| Some(*c)).collect()),
        )
        .expect("dataset")
    }

    #[test]
    fn every_key_appears_once_in_sorted_order() {
        let source = dataset(&["id", "title"], &[&["b", "B"], &["a", "A"]]);
        let target = dataset(&["jid", "name"], &[&["c", "C"], &["a", "A"]]);
        let join = outer_join(&source, &["id"], &target, &["jid"]);
        let rows: Vec<_> = join.rows().collect();
        let keys: Vec<String> = rows.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(rows[0].match_state(), MatchState::Matched);
        assert_eq!(rows[1].match_state(), MatchState::SourceOnly);
        assert_eq!(rows[2].match_state(), MatchState::TargetOnly);
        assert!(rows[1].cell(Side::Target, "name").is_missing());
        assert!(rows[2].cell(Side::Source, "title").is_missing());
    }

    #[test]
    fn composite_keys_render_with_pipes() {
        let source = dataset(&["item", "seq"], &[&["i1", "2"]]);
        let target = dataset(&["item", "seq"], &[&["i1", "2"]]);
        let join = outer_join(&source, &["item", "seq"], &target, &["item", "seq"]);
        let row = join.rows().next().expect("one row");
        assert_eq!(row.key.to_string(), "i1|2");
        assert_eq!(row.match_state(), MatchState::Matched);
    }

    #[test]
    fn duplicate_keys_pair_every_combination() {
        let source = dataset(&["id"], &[&["a"], &["a"]]);
        let target = dataset(&["id"], &[&["a"], &["a"]]);
        let join = outer_join(&source, &["id"], &target, &["id"]);
        assert_eq!(join.key_count(), 1);
        assert_eq!(join.rows().count(), 4);
    }

    #[test]
    fn rows_with_missing_key_components_never_join() {
        let source = Dataset::from_rows(
            &["id", "title"],
            [vec![Some("1"), None], vec![Some("2"), Some("A")]],
        )
        .expect("dataset");
        let target = Dataset::from_rows(
            &["uuid", "name"],
            [vec![Some("u-9"), None], vec![Some("u-1"), Some("A")]],
        )
        .expect("dataset");
        let join = outer_join(&source, &["title"], &target, &["name"]);
        let rows: Vec<_> = join.rows().collect();
        let states: Vec<_> = rows.iter().map(|r| r.match_state()).collect();
        assert_eq!(
            states,
            [MatchState::Matched, MatchState::SourceOnly, MatchState::TargetOnly]
        );
        assert_eq!(rows[1].cell(Side::Source, "id"), &Cell::text("1"));
        assert!(rows[1].cell(Side::Target, "uuid").is_missing());
        assert_eq!(rows[2].cell(Side::Target, "uuid"), &Cell::text("u-9"));
        assert!(!rows[1].key.is_complete());
    }

    #[test]
    fn missing_and_empty_keys_stay_apart() {
        let source = Dataset::from_rows(&["id"], [vec![Some("")]]).expect("dataset");
        let target = Dataset::from_rows(&["id"], [vec![None], vec![Some("")]]).expect("dataset");
        let join = outer_join(&source, &["id"], &target, &["id"]);
        let states: Vec<_> = join.rows().map(|r| r.match_state()).collect();
        assert_eq!(states, [MatchState::Matched, MatchState::TargetOnly]);
        assert_eq!(join.key_count(), 2);
    }

    #[test]
    fn colliding_columns_get_side_suffixes() {
        let source = dataset(&["id", "title", "description"], &[]);
        let target = dataset(&["uuid", "title", "id"], &[]);
        let names: Vec<String> = merged_columns(&source, &["id"], &target, &["uuid"])
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(
            names,
            ["id_source", "title_source", "description", "uuid", "title_target", "id_target"]
        );
    }

    #[test]
    fn shared_key_columns_coalesce() {
        let source = dataset(&["item", "size"], &[&["i1", "10"]]);
        let target = dataset(&["item", "size"], &[&["i2", "11"]]);
        let columns = merged_columns(&source, &["item"], &target, &["item"]);
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["item", "size_source", "size_target"]);
        let join = outer_join(&source, &["item"], &target, &["item"]);
        let rows: Vec<_> = join.rows().collect();
        assert_eq!(rows[1].merged_cell(&columns[0]), &Cell::text("i2"));
        assert!(rows[1].merged_cell(&columns[1]).is_missing());
    }
}
