//! Observation RINEX Header
use gnss_rs::prelude::Constellation;
use hifitime::TimeScale;

use crate::{catalog::ObservableCatalog, version::Version};

mod parsing;

/// Describes the header section of an Observation RINEX
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// RINEX [Version]
    pub version: Version,
    /// File type letter (`O` for Observation RINEX)
    pub rinex_type: char,
    /// GNSS [Constellation] describing this entire file
    pub constellation: Option<Constellation>,
    /// [TimeScale] of all epochs, defined by `TIME OF FIRST OBS`
    pub timescale: TimeScale,
    /// Station name, if any
    pub marker_name: Option<String>,
    /// Comments from this section
    pub comments: Vec<String>,
    /// Line number of the `END OF HEADER` marker
    pub end_of_header: usize,
    /// Observables described by this header
    pub catalog: ObservableCatalog,
}

impl Header {
    /// Returns true if this is an Observation RINEX header
    pub fn is_observation(&self) -> bool {
        self.rinex_type == 'O'
    }

    /// System letter to apply to RINEX 2 satellites that omit it:
    /// the header constellation, GPS for mixed or undefined files.
    pub(crate) fn default_system(&self) -> char {
        match self.constellation {
            Some(Constellation::Glonass) => 'R',
            Some(Constellation::Galileo) => 'E',
            Some(c) if c.is_sbas() => 'S',
            Some(Constellation::BeiDou) => 'C',
            Some(Constellation::QZSS) => 'J',
            Some(Constellation::IRNSS) => 'I',
            _ => 'G',
        }
    }
}
