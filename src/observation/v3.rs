//! RINEX 3/4 epoch blocks: one line per satellite,
//! with observables that depend on the satellite system.
use hifitime::Epoch;
use log::debug;

use crate::{
    catalog::ObservableCatalog,
    constants::ObsLayout,
    fixed_field,
    header::Header,
    observation::{decode_signal, normalize_prn},
    table::{ObsRow, Signal, TableSchema},
};

/// Decodes the satellite lines of one block (epoch line excluded).
/// Rows are grouped by system, in order of declaration.
pub(crate) fn decode_block(
    block: &[String],
    epoch: Epoch,
    header: &Header,
    schema: &TableSchema,
) -> Vec<ObsRow> {
    let systems = match &header.catalog {
        ObservableCatalog::V3(systems) => systems,
        ObservableCatalog::V2(_) => return Vec::new(),
    };

    let default_system = header.default_system();

    let lines = block
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let prn = normalize_prn(fixed_field(line, 0, ObsLayout::PRN_WIDTH), default_system);
            (prn, line.as_str())
        })
        .collect::<Vec<_>>();

    for (prn, _) in lines.iter() {
        if !prn
            .chars()
            .next()
            .is_some_and(|sys| systems.iter().any(|declared| declared.system == sys))
        {
            debug!("{}: undeclared system, dropping {}", epoch, prn);
        }
    }

    let mut rows = Vec::with_capacity(lines.len());

    for system in systems.iter() {
        let positions = match schema.system_positions(system.system) {
            Some(positions) => positions,
            None => continue,
        };

        for (prn, line) in lines.iter() {
            if !prn.starts_with(system.system) {
                continue;
            }

            let mut signals = vec![Signal::default(); schema.width()];

            for (rank, position) in positions.iter().enumerate() {
                let offset = ObsLayout::PRN_WIDTH + rank * ObsLayout::FIELD_WIDTH;
                signals[*position] = decode_signal(line, offset);
            }

            rows.push(ObsRow {
                epoch,
                sys: system.system,
                prn: prn.clone(),
                signals,
            });
        }
    }

    rows
}
