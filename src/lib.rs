#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*
 * RNX2TAB is part of the Geo-Rust framework.
 * Authors: Guillaume W. Bres <guillaume.bressaix@gmail.com> et al.
 * (cf. https://github.com/georust/rinex/graphs/contributors)
 * This framework is shipped under both Apache-2.0 and MIT License.
 */

extern crate gnss_rs as gnss;

#[macro_use]
extern crate lazy_static;

pub mod catalog;
pub mod epoch;
pub mod header;
pub mod observation;
pub mod reader;
pub mod table;
pub mod version;

mod constants;
mod error;

#[cfg(test)]
mod tests;

use std::path::Path;

/// Package to include all basic structures
pub mod prelude {
    pub use crate::{
        catalog::{ObservableCatalog, ObservableList, SystemObservables},
        epoch::{index::EpochEntry, EpochFlag},
        error::{Error, ParsingError, TableError},
        header::Header,
        reader::{CancellationToken, ObsReader, Progress, Revision},
        table::{Cell, ObsRow, ObservationTable, Signal},
        version::Version,
    };
    // pub re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
}

use prelude::{Error, ObsReader, ObservationTable, Revision};

/// Returns the `[start, end)` slice of this fixed width line.
/// Lines may be shorter than the standard width (trailing
/// whitespaces are often omitted): missing content is empty.
pub(crate) fn fixed_field(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("")
}

/// Reads a RINEX 2 Observation file into an [ObservationTable]
/// sorted by (epoch, prn).
/// `set_index`: columns to index the table with, which must describe
/// a unique key. Table is then sorted by this key.
/// ```
/// use rnx2tab::prelude::*;
/// let table = rnx2tab::read_rinex2_obs("test_resources/OBS/V2/ajac0010.21o", None)
///     .unwrap();
/// assert_eq!(&table.columns()[..3], &["epoch", "sys", "prn"]);
/// ```
pub fn read_rinex2_obs(
    path: impl AsRef<Path>,
    set_index: Option<&[&str]>,
) -> Result<ObservationTable, Error> {
    let mut reader = ObsReader::new().with_revision(Revision::V2);
    if let Some(keys) = set_index {
        reader = reader.with_index(keys);
    }
    reader.read_file(path)
}

/// Reads a RINEX 3 or 4 Observation file into an [ObservationTable].
/// Rows follow the epoch order, then the order systems are declared in.
/// `set_index`: columns to index the table with, which must describe
/// a unique key. Table is then sorted by this key.
/// ```
/// use rnx2tab::prelude::*;
/// let table = rnx2tab::read_rinex3_obs(
///     "test_resources/OBS/V3/ACOR00ESP.rnx",
///     Some(&["epoch", "prn"]))
///     .unwrap();
/// assert_eq!(table.index(), Some(&["epoch".to_string(), "prn".to_string()][..]));
/// ```
pub fn read_rinex3_obs(
    path: impl AsRef<Path>,
    set_index: Option<&[&str]>,
) -> Result<ObservationTable, Error> {
    let mut reader = ObsReader::new().with_revision(Revision::V3);
    if let Some(keys) = set_index {
        reader = reader.with_index(keys);
    }
    reader.read_file(path)
}

/// Reads any supported Observation RINEX, picking the
/// decoder that matches its revision.
pub fn read_rinex_obs(
    path: impl AsRef<Path>,
    set_index: Option<&[&str]>,
) -> Result<ObservationTable, Error> {
    let mut reader = ObsReader::new();
    if let Some(keys) = set_index {
        reader = reader.with_index(keys);
    }
    reader.read_file(path)
}
