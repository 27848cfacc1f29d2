//! Epoch lines: timestamp, flag and number of satellites
use hifitime::{Epoch, TimeScale};
use regex::Regex;
use thiserror::Error;

use crate::{
    constants::{V2Layout, V3Layout},
    fixed_field,
    version::Version,
};

mod flag;
pub mod index;

pub use flag::{EpochFlag, Error as FlagError};

lazy_static! {
    /// RINEX 2 EPOCH/SAT record: 2 digit year and four more 2 digit groups
    static ref V2_EPOCH_LINE: Regex = Regex::new(r"^ {1,2}([0-9]{1,2} * ){5}").unwrap();
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("expecting \"yyyy mm dd hh mm ss.ssss\" format")]
    FormatError,
    #[error("failed to parse years from \"{0}\"")]
    YearField(String),
    #[error("failed to parse months from \"{0}\"")]
    MonthField(String),
    #[error("failed to parse days from \"{0}\"")]
    DayField(String),
    #[error("failed to parse hours from \"{0}\"")]
    HoursField(String),
    #[error("failed to parse minutes field from \"{0}\"")]
    MinutesField(String),
    #[error("failed to parse seconds field from \"{0}\"")]
    SecondsField(String),
    #[error("failed to parse nanos from \"{0}\"")]
    NanosecondsField(String),
    #[error("invalid date \"{0}\"")]
    InvalidDate(String),
    #[error("epoch flag: {0}")]
    Flag(#[from] FlagError),
    #[error("failed to parse number of satellites from \"{0}\"")]
    NumSatField(String),
    #[error("missing epoch marker")]
    MissingMarker,
}

/// Content of one EPOCH record, as found at the start of each epoch block
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EpochLine {
    /// Sampling instant. Only RINEX 2 events are allowed to omit it.
    pub epoch: Option<Epoch>,
    /// [EpochFlag]
    pub flag: EpochFlag,
    /// Number of satellites, or number of special records for events
    pub num_sat: usize,
}

/// Returns the [TimeScale] described by the `TIME OF FIRST OBS` system field.
/// Glonass time is UTC based. QZSS and IRNSS are aligned to GPST.
pub fn timescale_from_system(system: &str) -> Option<TimeScale> {
    match system.trim() {
        "GPS" | "QZS" | "IRN" => Some(TimeScale::GPST),
        "GAL" => Some(TimeScale::GST),
        "BDT" => Some(TimeScale::BDT),
        "GLO" | "UTC" => Some(TimeScale::UTC),
        "TAI" => Some(TimeScale::TAI),
        _ => None,
    }
}

/// Parses "yy mm dd hh mm ss.sssssss" (or 4 digit year) content,
/// interpreted as a datetime within specified [TimeScale].
pub fn parse_in_timescale(content: &str, ts: TimeScale) -> Result<Epoch, ParsingError> {
    let items = content.split_ascii_whitespace().collect::<Vec<_>>();
    if items.len() < 6 {
        return Err(ParsingError::FormatError);
    }

    let mut y = items[0]
        .parse::<i32>()
        .map_err(|_| ParsingError::YearField(items[0].to_string()))?;

    // old RINEX: YY is encoded on two digits
    if y < 100 {
        if y < 80 {
            y += 2000;
        } else {
            y += 1900;
        }
    }

    let m = items[1]
        .parse::<u8>()
        .map_err(|_| ParsingError::MonthField(items[1].to_string()))?;
    let d = items[2]
        .parse::<u8>()
        .map_err(|_| ParsingError::DayField(items[2].to_string()))?;
    let hh = items[3]
        .parse::<u8>()
        .map_err(|_| ParsingError::HoursField(items[3].to_string()))?;
    let mm = items[4]
        .parse::<u8>()
        .map_err(|_| ParsingError::MinutesField(items[4].to_string()))?;

    let (ss, ns) = match items[5].split_once('.') {
        Some((secs, fract)) => {
            let ss = secs
                .parse::<u8>()
                .map_err(|_| ParsingError::SecondsField(items[5].to_string()))?;
            // keep nanosecond precision at most
            let fract = &fract[..fract.len().min(9)];
            let ns = if fract.is_empty() {
                0
            } else {
                let digits = fract
                    .parse::<u32>()
                    .map_err(|_| ParsingError::NanosecondsField(items[5].to_string()))?;
                digits * 10_u32.pow(9 - fract.len() as u32)
            };
            (ss, ns)
        },
        None => {
            let ss = items[5]
                .parse::<u8>()
                .map_err(|_| ParsingError::SecondsField(items[5].to_string()))?;
            (ss, 0)
        },
    };

    Epoch::maybe_from_gregorian(y, m, d, hh, mm, ss, ns, ts)
        .map_err(|_| ParsingError::InvalidDate(content.trim().to_string()))
}

/// Returns true if given line opens a new epoch block
pub fn is_new_epoch(line: &str, version: Version) -> bool {
    if version.is_modern() {
        return line.starts_with(V3Layout::EPOCH_MARKER);
    }

    let date = fixed_field(line, 0, V2Layout::FLAG_START);
    let flag = fixed_field(line, V2Layout::FLAG_START, V2Layout::FLAG_END)
        .trim()
        .parse::<EpochFlag>();

    let num_sat = fixed_field(line, V2Layout::NUM_SAT_START, V2Layout::NUM_SAT_END)
        .trim()
        .parse::<usize>();

    match (flag, num_sat) {
        (Ok(flag), Ok(_)) => {
            if date.trim().is_empty() {
                // events are allowed to omit the date
                flag.is_event()
            } else {
                V2_EPOCH_LINE.is_match(line)
                    && parse_in_timescale(date, TimeScale::GPST).is_ok()
            }
        },
        _ => false,
    }
}

/// Parses one EPOCH record line, in the file [TimeScale].
pub fn parse_epoch_line(
    line: &str,
    version: Version,
    ts: TimeScale,
) -> Result<EpochLine, ParsingError> {
    let (date, flag, num_sat) = if version.is_modern() {
        if !line.starts_with(V3Layout::EPOCH_MARKER) {
            return Err(ParsingError::MissingMarker);
        }
        (
            fixed_field(line, 1, V3Layout::FLAG_START),
            fixed_field(line, V3Layout::FLAG_START, V3Layout::FLAG_END),
            fixed_field(line, V3Layout::NUM_SAT_START, V3Layout::NUM_SAT_END),
        )
    } else {
        (
            fixed_field(line, 0, V2Layout::FLAG_START),
            fixed_field(line, V2Layout::FLAG_START, V2Layout::FLAG_END),
            fixed_field(line, V2Layout::NUM_SAT_START, V2Layout::NUM_SAT_END),
        )
    };

    let flag = flag.trim().parse::<EpochFlag>()?;

    let num_sat = num_sat
        .trim()
        .parse::<usize>()
        .map_err(|_| ParsingError::NumSatField(num_sat.to_string()))?;

    let epoch = if date.trim().is_empty() && flag.is_event() && !version.is_modern() {
        None
    } else {
        Some(parse_in_timescale(date, ts)?)
    };

    Ok(EpochLine {
        epoch,
        flag,
        num_sat,
    })
}
