//! Observation table: one row per (epoch, satellite)
use std::{cmp::Ordering, str::FromStr};

use gnss_rs::prelude::{Constellation, SV};
use hifitime::Epoch;
use itertools::Itertools;

use crate::{
    catalog::{ObservableCatalog, LLI_SUFFIX, SSI_SUFFIX},
    error::TableError,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One observation: value with its indicators.
/// Any of them may be missing.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Signal {
    /// Observed value
    pub value: Option<f64>,
    /// Loss of lock indicator
    pub lli: Option<char>,
    /// Signal strength indicator
    pub ssi: Option<char>,
}

impl Signal {
    /// Returns true if nothing was observed
    pub fn is_missing(&self) -> bool {
        self.value.is_none() && self.lli.is_none() && self.ssi.is_none()
    }
}

/// [ObsRow] describes one satellite at one epoch
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObsRow {
    /// Sampling instant
    pub epoch: Epoch,
    /// System code (first letter of the PRN)
    pub sys: char,
    /// Satellite identifier, like `G01`
    pub prn: String,
    /// One [Signal] per table observable, in the table order
    pub signals: Vec<Signal>,
}

impl ObsRow {
    /// Returns the [Constellation] of this satellite
    pub fn constellation(&self) -> Option<Constellation> {
        Constellation::from_str(&self.sys.to_string()).ok()
    }
    /// Returns this satellite as [SV]
    pub fn sv(&self) -> Option<SV> {
        SV::from_str(&self.prn).ok()
    }
}

/// Single table cell
#[derive(Debug, Copy, Clone)]
pub enum Cell<'a> {
    Epoch(Epoch),
    Char(char),
    Text(&'a str),
    Float(f64),
    /// Missing value (sorted last)
    Missing,
}

impl Cell<'_> {
    fn rank(&self) -> u8 {
        match self {
            Self::Epoch(_) => 0,
            Self::Char(_) => 1,
            Self::Text(_) => 2,
            Self::Float(_) => 3,
            Self::Missing => 4,
        }
    }
    /// Returns true if this cell is missing
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl PartialEq for Cell<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cell<'_> {}

impl PartialOrd for Cell<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Epoch(a), Self::Epoch(b)) => a.cmp(b),
            (Self::Char(a), Self::Char(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl std::fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Epoch(t) => write!(f, "{}", t),
            Self::Char(c) => write!(f, "{}", c),
            Self::Text(s) => write!(f, "{}", s),
            Self::Float(v) => write!(f, "{}", v),
            Self::Missing => write!(f, "NaN"),
        }
    }
}

/// Resolved column
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
enum Column {
    Epoch,
    Sys,
    Prn,
    Value(usize),
    Lli(usize),
    Ssi(usize),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Index {
    names: Vec<String>,
    columns: Vec<Column>,
}

/// How decoded observations map to table columns
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TableSchema {
    /// Table observables, in column order
    pub observables: Vec<String>,
    /// RINEX 2: declaration rank to table rank
    shared: Vec<usize>,
    /// RINEX 3/4: same thing, per system
    systems: Vec<(char, Vec<usize>)>,
}

impl TableSchema {
    /// RINEX 2 observables are sorted, RINEX 3/4 observables
    /// appear as systems declare them.
    pub fn from_catalog(catalog: &ObservableCatalog) -> Self {
        match catalog {
            ObservableCatalog::V2(list) => {
                let observables = list.codes.iter().sorted().dedup().cloned().collect::<Vec<_>>();
                let shared = list
                    .codes
                    .iter()
                    .filter_map(|code| observables.iter().position(|obs| obs == code))
                    .collect();
                Self {
                    observables,
                    shared,
                    systems: Vec::new(),
                }
            },
            ObservableCatalog::V3(systems) => {
                let observables = systems
                    .iter()
                    .flat_map(|sys| sys.list.codes.iter())
                    .unique()
                    .cloned()
                    .collect::<Vec<_>>();
                let systems = systems
                    .iter()
                    .map(|sys| {
                        let positions = sys
                            .list
                            .codes
                            .iter()
                            .filter_map(|code| observables.iter().position(|obs| obs == code))
                            .collect();
                        (sys.system, positions)
                    })
                    .collect();
                Self {
                    observables,
                    shared: Vec::new(),
                    systems,
                }
            },
        }
    }
    /// Number of observables per row
    pub fn width(&self) -> usize {
        self.observables.len()
    }
    /// Table ranks of the RINEX 2 observables, in declaration order
    pub fn shared_positions(&self) -> &[usize] {
        &self.shared
    }
    /// Table ranks of this system's observables, in declaration order
    pub fn system_positions(&self, system: char) -> Option<&[usize]> {
        self.systems
            .iter()
            .find(|(sys, _)| *sys == system)
            .map(|(_, positions)| positions.as_slice())
    }
}

/// [ObservationTable] stores all observations of a file,
/// one row per (epoch, satellite). Columns are `epoch`, `sys`, `prn`
/// then one (value, `_LLI`, `_SSI`) triple per observable.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObservationTable {
    observables: Vec<String>,
    rows: Vec<ObsRow>,
    index: Option<Index>,
}

impl ObservationTable {
    /// Builds a new [ObservationTable] from rows whose signals
    /// follow the order of the observables.
    pub fn new(observables: Vec<String>, rows: Vec<ObsRow>) -> Self {
        Self {
            observables,
            rows,
            index: None,
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if this table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Observables, in column order
    pub fn observables(&self) -> &[String] {
        &self.observables
    }

    /// All column names
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec!["epoch".to_string(), "sys".to_string(), "prn".to_string()];
        for code in self.observables.iter() {
            columns.push(code.clone());
            columns.push(format!("{}{}", code, LLI_SUFFIX));
            columns.push(format!("{}{}", code, SSI_SUFFIX));
        }
        columns
    }

    /// All rows
    pub fn rows(&self) -> &[ObsRow] {
        &self.rows
    }

    /// Consumes this table into its rows
    pub fn into_rows(self) -> Vec<ObsRow> {
        self.rows
    }

    /// [ObsRow]s iterator
    pub fn iter(&self) -> std::slice::Iter<'_, ObsRow> {
        self.rows.iter()
    }

    /// Key columns, if this table is indexed
    pub fn index(&self) -> Option<&[String]> {
        self.index.as_ref().map(|index| index.names.as_slice())
    }

    /// Returns the [Signal] observed on given row for this observable
    pub fn signal(&self, row: usize, observable: &str) -> Option<&Signal> {
        let rank = self.observables.iter().position(|obs| obs == observable)?;
        self.rows.get(row)?.signals.get(rank)
    }

    /// Returns the [Cell] at this (row, column)
    pub fn cell(&self, row: usize, column: &str) -> Option<Cell<'_>> {
        let column = self.resolve(column).ok()?;
        self.rows.get(row).map(|row| Self::row_cell(row, column))
    }

    /// Returns all [Cell]s of this column
    pub fn column(&self, name: &str) -> Result<Vec<Cell<'_>>, TableError> {
        let column = self.resolve(name)?;
        Ok(self
            .rows
            .iter()
            .map(|row| Self::row_cell(row, column))
            .collect())
    }

    /// Unique epochs, in chronological order
    pub fn epochs(&self) -> Vec<Epoch> {
        self.rows.iter().map(|row| row.epoch).sorted().dedup().collect()
    }

    /// Rows of this system
    pub fn system_rows(&self, sys: char) -> impl Iterator<Item = &ObsRow> + '_ {
        self.rows.iter().filter(move |row| row.sys == sys)
    }

    /// Rows sampled at this epoch
    pub fn epoch_rows(&self, epoch: Epoch) -> impl Iterator<Item = &ObsRow> + '_ {
        self.rows.iter().filter(move |row| row.epoch == epoch)
    }

    /// Indexes this table with given columns, then sorts it by this key.
    /// The key must be unique, otherwise the table is left untouched.
    pub fn set_index<S: AsRef<str>>(&mut self, keys: &[S]) -> Result<(), TableError> {
        if keys.is_empty() {
            return Err(TableError::EmptyIndex);
        }

        let columns = keys
            .iter()
            .map(|key| self.resolve(key.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let order = {
            let keys = self
                .rows
                .iter()
                .map(|row| Self::row_key(row, &columns))
                .collect::<Vec<_>>();

            let mut order = (0..self.rows.len()).collect::<Vec<_>>();
            order.sort_by(|a, b| keys[*a].cmp(&keys[*b]));

            for pair in order.windows(2) {
                if keys[pair[0]] == keys[pair[1]] {
                    return Err(TableError::ReindexAmbiguity(format!(
                        "({})",
                        keys[pair[0]].iter().join(", ")
                    )));
                }
            }
            order
        };

        let mut slots = std::mem::take(&mut self.rows)
            .into_iter()
            .map(Some)
            .collect::<Vec<_>>();

        self.rows = order.iter().filter_map(|nth| slots[*nth].take()).collect();

        self.index = Some(Index {
            names: keys.iter().map(|key| key.as_ref().to_string()).collect(),
            columns,
        });

        Ok(())
    }

    /// Copies and returns [Self] indexed by given columns
    pub fn with_index<S: AsRef<str>>(&self, keys: &[S]) -> Result<Self, TableError> {
        let mut s = self.clone();
        s.set_index(keys)?;
        Ok(s)
    }

    /// Drops the index. Rows keep their current order.
    pub fn reset_index(&mut self) {
        self.index = None;
    }

    /// Returns the row matching this key, on an indexed table
    pub fn get(&self, key: &[Cell<'_>]) -> Option<&ObsRow> {
        let index = self.index.as_ref()?;
        self.rows
            .binary_search_by(|row| Self::row_key(row, &index.columns).as_slice().cmp(key))
            .ok()
            .map(|nth| &self.rows[nth])
    }

    /// Sorts rows by (epoch, prn)
    pub(crate) fn sort_by_epoch_prn(&mut self) {
        self.rows
            .sort_by(|a, b| a.epoch.cmp(&b.epoch).then_with(|| a.prn.cmp(&b.prn)));
    }

    fn resolve(&self, name: &str) -> Result<Column, TableError> {
        match name {
            "epoch" => return Ok(Column::Epoch),
            "sys" => return Ok(Column::Sys),
            "prn" => return Ok(Column::Prn),
            _ => {},
        }
        if let Some(rank) = self.rank(name) {
            return Ok(Column::Value(rank));
        }
        if let Some(rank) = name.strip_suffix(LLI_SUFFIX).and_then(|code| self.rank(code)) {
            return Ok(Column::Lli(rank));
        }
        if let Some(rank) = name.strip_suffix(SSI_SUFFIX).and_then(|code| self.rank(code)) {
            return Ok(Column::Ssi(rank));
        }
        Err(TableError::UnknownColumn(name.to_string()))
    }

    fn rank(&self, code: &str) -> Option<usize> {
        self.observables.iter().position(|obs| obs == code)
    }

    fn row_cell(row: &ObsRow, column: Column) -> Cell<'_> {
        let signal = |rank: usize| row.signals.get(rank).copied().unwrap_or_default();
        match column {
            Column::Epoch => Cell::Epoch(row.epoch),
            Column::Sys => Cell::Char(row.sys),
            Column::Prn => Cell::Text(&row.prn),
            Column::Value(rank) => signal(rank).value.map_or(Cell::Missing, Cell::Float),
            Column::Lli(rank) => signal(rank).lli.map_or(Cell::Missing, Cell::Char),
            Column::Ssi(rank) => signal(rank).ssi.map_or(Cell::Missing, Cell::Char),
        }
    }

    fn row_key<'a>(row: &'a ObsRow, columns: &[Column]) -> Vec<Cell<'a>> {
        columns
            .iter()
            .map(|column| Self::row_cell(row, *column))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ObservationTable {
    type Item = &'a ObsRow;
    type IntoIter = std::slice::Iter<'a, ObsRow>;
    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hifitime::TimeScale;

    fn t(secs: u8) -> Epoch {
        Epoch::from_gregorian(2021, 1, 1, 0, 0, secs, 0, TimeScale::GPST)
    }

    fn row(secs: u8, prn: &str, c1: Option<f64>) -> ObsRow {
        ObsRow {
            epoch: t(secs),
            sys: prn.chars().next().unwrap(),
            prn: prn.to_string(),
            signals: vec![
                Signal {
                    value: c1,
                    lli: None,
                    ssi: Some('7'),
                },
                Signal::default(),
            ],
        }
    }

    fn table() -> ObservationTable {
        ObservationTable::new(
            vec!["C1".to_string(), "L1".to_string()],
            vec![
                row(30, "G02", Some(2.0)),
                row(0, "R01", None),
                row(0, "G01", Some(1.0)),
                row(30, "G01", Some(3.0)),
            ],
        )
    }

    #[test]
    fn columns() {
        let table = table();
        assert_eq!(
            table.columns(),
            vec!["epoch", "sys", "prn", "C1", "C1_LLI", "C1_SSI", "L1", "L1_LLI", "L1_SSI"]
        );
        assert_eq!(table.len(), 4);
        assert!(!table.is_empty());
        assert_eq!(table.epochs(), vec![t(0), t(30)]);
    }

    #[test]
    fn cells() {
        let table = table();
        assert_eq!(table.cell(0, "prn"), Some(Cell::Text("G02")));
        assert_eq!(table.cell(0, "sys"), Some(Cell::Char('G')));
        assert_eq!(table.cell(0, "C1"), Some(Cell::Float(2.0)));
        assert_eq!(table.cell(0, "C1_SSI"), Some(Cell::Char('7')));
        assert_eq!(table.cell(0, "C1_LLI"), Some(Cell::Missing));
        assert_eq!(table.cell(1, "C1"), Some(Cell::Missing));
        assert_eq!(table.cell(0, "P2"), None);
        assert_eq!(table.cell(10, "C1"), None);
        assert_eq!(
            table.column("D1"),
            Err(TableError::UnknownColumn("D1".to_string()))
        );
        assert_eq!(table.column("L1").unwrap().len(), 4);
        assert!(table.column("L1").unwrap().iter().all(|c| c.is_missing()));
        assert_eq!(table.signal(2, "C1").unwrap().value, Some(1.0));
    }

    #[test]
    fn epoch_prn_sorting() {
        let mut table = table();
        table.sort_by_epoch_prn();
        let prns = table.iter().map(|row| row.prn.as_str()).collect::<Vec<_>>();
        assert_eq!(prns, vec!["G01", "R01", "G01", "G02"]);
        assert_eq!(table.rows()[0].epoch, t(0));
        assert_eq!(table.rows()[3].epoch, t(30));
    }

    #[test]
    fn indexing() {
        let mut table = table();
        table.set_index(&["epoch", "prn"]).unwrap();
        assert_eq!(
            table.index(),
            Some(&["epoch".to_string(), "prn".to_string()][..])
        );
        let prns = table.iter().map(|row| row.prn.as_str()).collect::<Vec<_>>();
        assert_eq!(prns, vec!["G01", "R01", "G01", "G02"]);

        let found = table.get(&[Cell::Epoch(t(30)), Cell::Text("G02")]).unwrap();
        assert_eq!(found.signals[0].value, Some(2.0));
        assert!(table.get(&[Cell::Epoch(t(30)), Cell::Text("R01")]).is_none());

        // same table, up to row order
        let indexed = table.clone();
        table.reset_index();
        assert!(table.index().is_none());
        assert!(table.get(&[Cell::Epoch(t(30)), Cell::Text("G02")]).is_none());
        table.set_index(&["epoch", "prn"]).unwrap();
        assert_eq!(table, indexed);
    }

    #[test]
    fn missing_values_sort_last() {
        let mut table = table();
        table.set_index(&["C1"]).unwrap();
        let values = table.column("C1").unwrap();
        assert_eq!(
            values,
            vec![Cell::Float(1.0), Cell::Float(2.0), Cell::Float(3.0), Cell::Missing]
        );
    }

    #[test]
    fn ambiguous_index() {
        let mut table = table();
        let original = table.clone();
        assert!(matches!(
            table.set_index(&["prn"]),
            Err(TableError::ReindexAmbiguity(_))
        ));
        assert_eq!(table, original, "failed index must leave table untouched");
        assert_eq!(table.set_index::<&str>(&[]), Err(TableError::EmptyIndex));
        assert_eq!(
            table.set_index(&["epoch", "svnn"]),
            Err(TableError::UnknownColumn("svnn".to_string()))
        );
    }

    #[test]
    fn rows() {
        let table = table();
        let r = &table.rows()[1];
        assert_eq!(r.constellation(), Some(Constellation::Glonass));
        assert_eq!(r.sv(), Some(SV::new(Constellation::Glonass, 1)));
        assert_eq!(table.system_rows('G').count(), 3);
        assert_eq!(table.epoch_rows(t(0)).count(), 2);
        assert!(table.rows()[1].signals[1].is_missing());
    }
}
