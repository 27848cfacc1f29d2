//! RINEX 2 epoch blocks: satellite list followed by
//! observation records shared by all satellites.
use hifitime::Epoch;
use itertools::Itertools;
use log::{debug, warn};
use num_integer::div_ceil;

use crate::{
    constants::{ObsLayout, V2Layout},
    epoch::{is_new_epoch, parse_epoch_line, EpochFlag},
    error::ParsingError,
    fixed_field,
    header::Header,
    observation::{decode_signal, normalize_prn},
    table::{ObsRow, Signal, TableSchema},
};

/// EPOCH/SAT record of one block
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteList {
    /// Sampling instant
    pub epoch: Epoch,
    /// Epoch flag
    pub flag: EpochFlag,
    /// Number of satellites
    pub num_sat: usize,
    /// Satellite list, as found in the epoch and continuation lines
    pub text: String,
    /// Normalized satellite identifiers, in order of appearance
    pub prns: Vec<String>,
    /// Last line of the satellite list, relative to the block
    pub last_line: usize,
}

/// Locates the EPOCH/SAT record of this block and gathers its
/// satellite list, which may continue on following lines.
/// `offset` is the line number of the block, for error reports.
pub fn find_satellites(
    block: &[String],
    offset: usize,
    header: &Header,
) -> Result<SatelliteList, ParsingError> {
    let first = block
        .iter()
        .position(|line| is_new_epoch(line, header.version))
        .ok_or(ParsingError::EpochBlockMalformed(offset))?;

    let parsed = parse_epoch_line(&block[first], header.version, header.timescale)?;

    let epoch = parsed
        .epoch
        .ok_or(ParsingError::EpochBlockMalformed(offset + first))?;

    let num_sat = parsed.num_sat;
    let num_lines = div_ceil(num_sat, V2Layout::SATS_PER_LINE).max(1);
    let last_line = first + num_lines - 1;

    let mut text = String::with_capacity(num_sat * ObsLayout::PRN_WIDTH);

    for nth in first..=last_line {
        let line = block
            .get(nth)
            .ok_or(ParsingError::EpochBlockMalformed(offset + first))?;

        let segment = fixed_field(line, V2Layout::SAT_LIST_START, V2Layout::SAT_LIST_END);
        text.push_str(segment);

        if nth < last_line {
            // trailing whitespaces may have been stripped
            let width = V2Layout::SAT_LIST_END - V2Layout::SAT_LIST_START;
            for _ in segment.len()..width {
                text.push(' ');
            }
        }
    }

    let default_system = header.default_system();

    let prns = text
        .chars()
        .chunks(ObsLayout::PRN_WIDTH)
        .into_iter()
        .take(num_sat)
        .map(|token| normalize_prn(&token.collect::<String>(), default_system))
        .collect::<Vec<_>>();

    if prns.len() < num_sat {
        warn!(
            "line {}: {} satellites announced, {} listed",
            offset + first,
            num_sat,
            prns.len()
        );
        return Err(ParsingError::EpochBlockMalformed(offset + first));
    }

    Ok(SatelliteList {
        epoch,
        flag: parsed.flag,
        num_sat,
        text,
        prns,
        last_line,
    })
}

/// Decodes all observations of this block: one [ObsRow] per satellite.
pub(crate) fn decode_block(
    block: &[String],
    offset: usize,
    header: &Header,
    schema: &TableSchema,
) -> Result<Vec<ObsRow>, ParsingError> {
    let sats = find_satellites(block, offset, header)?;

    let nobs = header.catalog.nobs_max();
    let lines_per_sat = div_ceil(nobs, V2Layout::OBS_PER_LINE).max(1);

    let first_record = sats.last_line + 1;
    let expected = first_record + sats.num_sat * lines_per_sat;

    if block.len() < expected {
        warn!(
            "line {}: block is {} lines short, missing observations are blank",
            offset,
            expected - block.len()
        );
    }

    let positions = schema.shared_positions();
    let mut rows = Vec::with_capacity(sats.num_sat);

    for (nth, prn) in sats.prns.iter().enumerate() {
        let start = first_record + nth * lines_per_sat;

        let mut record = String::with_capacity(lines_per_sat * V2Layout::OBS_LINE_WIDTH);

        for line in start..start + lines_per_sat {
            let content = block.get(line).map(|line| line.as_str()).unwrap_or("");
            let content = fixed_field(content, 0, V2Layout::OBS_LINE_WIDTH);
            record.push_str(content);
            for _ in content.len()..V2Layout::OBS_LINE_WIDTH {
                record.push(' ');
            }
        }

        let mut signals = vec![Signal::default(); schema.width()];

        for (rank, position) in positions.iter().enumerate() {
            signals[*position] = decode_signal(&record, rank * ObsLayout::FIELD_WIDTH);
        }

        rows.push(ObsRow {
            epoch: sats.epoch,
            sys: prn.chars().next().unwrap_or(header.default_system()),
            prn: prn.clone(),
            signals,
        });
    }

    debug!("{}: {} satellites", sats.epoch, rows.len());
    Ok(rows)
}
