//! Epoch indexer: locates every epoch block of a file
use hifitime::Epoch;
use num_integer::div_ceil;

use crate::{
    constants::V2Layout,
    epoch::{is_new_epoch, parse_epoch_line, EpochFlag},
    error::ParsingError,
    header::Header,
};

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [EpochEntry] describes one epoch block
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EpochEntry {
    /// Sampling instant
    pub epoch: Epoch,
    /// [EpochFlag]
    pub flag: EpochFlag,
    /// Number of satellites (or special records, for events)
    pub num_sat: usize,
    /// Line number of the epoch record, counted from the first line
    /// of the file (header included)
    pub offset: usize,
}

/// Builds the ordered list of epoch blocks contained in this file.
/// Block `i` spans lines `[offset(i), offset(i+1))`, the last block
/// runs to the end of file. Event epochs are indexed too (they delimit
/// blocks) but are flagged as such. A RINEX 2 event that omits its date
/// inherits the previous timestamp; it is dropped when no epoch precedes it.
pub fn epoch_index(lines: &[String], header: &Header) -> Result<Vec<EpochEntry>, ParsingError> {
    let version = header.version;
    let mut entries = Vec::<EpochEntry>::with_capacity(lines.len() / 8);
    let mut latest = Option::<Epoch>::None;

    let mut nth = header.end_of_header + 1;

    while nth < lines.len() {
        let line = &lines[nth];

        if !is_new_epoch(line, version) {
            nth += 1;
            continue;
        }

        let parsed = parse_epoch_line(line, version, header.timescale)?;

        let lines_to_skip = if parsed.flag.is_event() {
            // epoch record + special records
            1 + parsed.num_sat
        } else if version.is_modern() {
            1
        } else {
            // epoch record + satellites continuation
            div_ceil(parsed.num_sat, V2Layout::SATS_PER_LINE).max(1)
        };

        match parsed.epoch.or(latest) {
            Some(epoch) => {
                entries.push(EpochEntry {
                    epoch,
                    flag: parsed.flag,
                    num_sat: parsed.num_sat,
                    offset: nth,
                });
                latest = Some(epoch);
            },
            None => {
                debug!("line {}: leading event without date", nth);
            },
        }

        nth += lines_to_skip;
    }

    debug!("{} epochs indexed", entries.len());
    Ok(entries)
}

/// Returns the line range of the block described by `entries[nth]`.
pub(crate) fn block_range(entries: &[EpochEntry], nth: usize, total_lines: usize) -> (usize, usize) {
    let start = entries[nth].offset;
    let end = match entries.get(nth + 1) {
        Some(next) => next.offset,
        None => total_lines,
    };
    (start, end)
}
