use std::path::{Path, PathBuf};

use hifitime::{Epoch, TimeScale};
use itertools::Itertools;

use crate::prelude::ObservationTable;

/// Returns path to this test resource
pub fn test_resource(revision: &str, filename: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test_resources")
        .join("OBS")
        .join(revision)
        .join(filename)
}

/// Installs the logger, once
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// GPST instant of this day
pub fn gpst(y: i32, m: u8, d: u8, hh: u8, mm: u8, ss: u8) -> Epoch {
    Epoch::from_gregorian(y, m, d, hh, mm, ss, 0, TimeScale::GPST)
}

/// Verifies the generic layout of an [ObservationTable]
pub fn generic_table_test(
    dut: &ObservationTable,
    observables: &[&str],
    num_rows: usize,
    epochs: &[Epoch],
) {
    assert_eq!(dut.observables(), observables, "wrong observables");

    let columns = dut.columns();
    assert_eq!(columns.len(), 3 + 3 * observables.len());
    assert_eq!(&columns[..3], &["epoch", "sys", "prn"]);

    for (nth, code) in observables.iter().enumerate() {
        assert_eq!(columns[3 + 3 * nth], *code);
        assert_eq!(columns[3 + 3 * nth + 1], format!("{}_LLI", code));
        assert_eq!(columns[3 + 3 * nth + 2], format!("{}_SSI", code));
    }

    assert_eq!(dut.len(), num_rows, "wrong number of rows");
    assert_eq!(dut.epochs(), epochs, "wrong epochs");

    for row in dut.iter() {
        assert_eq!(row.signals.len(), observables.len());
        assert_eq!(row.prn.len(), 3, "bad prn \"{}\"", row.prn);
        assert_eq!(row.prn.chars().next(), Some(row.sys));
    }
}

/// Returns all (epoch, prn) of this table, in row order
pub fn row_keys(dut: &ObservationTable) -> Vec<(Epoch, String)> {
    dut.iter()
        .map(|row| (row.epoch, row.prn.clone()))
        .collect_vec()
}
